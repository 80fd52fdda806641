//! Names a scope body binds, collected before the body is walked.

use oxc_ast::ast::{
    Declaration, ForStatementInit, ForStatementLeft, Statement, VariableDeclaration,
    VariableDeclarationKind,
};

use crate::frontend::patterns::binding_names;

fn variable_names(var: &VariableDeclaration<'_>, out: &mut Vec<String>) {
    for declarator in &var.declarations {
        binding_names(&declarator.id, out);
    }
}

fn declaration_name(decl: &Declaration<'_>, out: &mut Vec<String>) {
    match decl {
        Declaration::VariableDeclaration(var) => variable_names(var, out),
        Declaration::FunctionDeclaration(func) => {
            out.extend(func.id.as_ref().map(|id| id.name.to_string()));
        }
        Declaration::ClassDeclaration(class) => {
            out.extend(class.id.as_ref().map(|id| id.name.to_string()));
        }
        Declaration::TSEnumDeclaration(decl) => out.push(decl.id.name.to_string()),
        Declaration::TSTypeAliasDeclaration(decl) => out.push(decl.id.name.to_string()),
        Declaration::TSInterfaceDeclaration(decl) => out.push(decl.id.name.to_string()),
        _ => {}
    }
}

/// Declarations directly in a statement list.
pub(crate) fn scope_names(statements: &[Statement<'_>], out: &mut Vec<String>) {
    for statement in statements {
        if let Some(decl) = statement.as_declaration() {
            declaration_name(decl, out);
        }
    }
}

/// `var` declarations nested in blocks of a function body. Nested functions
/// are not entered.
pub(crate) fn hoisted_vars(statements: &[Statement<'_>], out: &mut Vec<String>) {
    for statement in statements {
        hoisted_in_statement(statement, out);
    }
}

fn var_only(var: &VariableDeclaration<'_>, out: &mut Vec<String>) {
    if var.kind == VariableDeclarationKind::Var {
        variable_names(var, out);
    }
}

fn hoisted_in_statement(statement: &Statement<'_>, out: &mut Vec<String>) {
    match statement {
        Statement::VariableDeclaration(var) => var_only(var, out),
        Statement::BlockStatement(block) => hoisted_vars(&block.body, out),
        Statement::IfStatement(stmt) => {
            hoisted_in_statement(&stmt.consequent, out);
            if let Some(alternate) = &stmt.alternate {
                hoisted_in_statement(alternate, out);
            }
        }
        Statement::ForStatement(stmt) => {
            if let Some(ForStatementInit::VariableDeclaration(var)) = &stmt.init {
                var_only(var, out);
            }
            hoisted_in_statement(&stmt.body, out);
        }
        Statement::ForInStatement(stmt) => {
            if let ForStatementLeft::VariableDeclaration(var) = &stmt.left {
                var_only(var, out);
            }
            hoisted_in_statement(&stmt.body, out);
        }
        Statement::ForOfStatement(stmt) => {
            if let ForStatementLeft::VariableDeclaration(var) = &stmt.left {
                var_only(var, out);
            }
            hoisted_in_statement(&stmt.body, out);
        }
        Statement::WhileStatement(stmt) => hoisted_in_statement(&stmt.body, out),
        Statement::DoWhileStatement(stmt) => hoisted_in_statement(&stmt.body, out),
        Statement::LabeledStatement(stmt) => hoisted_in_statement(&stmt.body, out),
        Statement::TryStatement(stmt) => {
            hoisted_vars(&stmt.block.body, out);
            if let Some(handler) = &stmt.handler {
                hoisted_vars(&handler.body.body, out);
            }
            if let Some(finalizer) = &stmt.finalizer {
                hoisted_vars(&finalizer.body, out);
            }
        }
        Statement::SwitchStatement(stmt) => {
            for case in &stmt.cases {
                hoisted_vars(&case.consequent, out);
            }
        }
        _ => {}
    }
}
