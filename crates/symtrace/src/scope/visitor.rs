//! AST walk recording free identifier references.

use oxc_ast::ast::{
    ArrowFunctionExpression, BlockStatement, CatchClause, Class, ExportNamedDeclaration,
    ForInStatement, ForOfStatement, ForStatement, ForStatementInit, ForStatementLeft, Function,
    IdentifierReference, ImportDeclaration, JSXElementName, ModuleExportName, StaticBlock,
    SwitchStatement, TSInterfaceDeclaration, TSTypeAliasDeclaration, VariableDeclaration,
};
use oxc_ast_visit::{Visit, walk};
use oxc_semantic::ScopeFlags;
use rustc_hash::FxHashSet;

use super::hoist::{hoisted_vars, scope_names};
use crate::frontend::patterns::{binding_names, parameter_names, type_parameter_names};

/// Collects names referenced at a point where no enclosing scope of the
/// fragment rebinds them.
#[derive(Debug, Default)]
pub(crate) struct ReferenceCollector {
    frames: Vec<FxHashSet<String>>,
    pub(crate) free: FxHashSet<String>,
}

impl ReferenceCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn is_shadowed(&self, name: &str) -> bool {
        self.frames.iter().rev().any(|frame| frame.contains(name))
    }

    fn reference(&mut self, name: &str) {
        if !self.is_shadowed(name) && !self.free.contains(name) {
            self.free.insert(name.to_string());
        }
    }

    /// Run `walk` with `names` bound for its duration.
    fn scoped(&mut self, names: Vec<String>, walk: impl FnOnce(&mut Self)) {
        self.frames.push(names.into_iter().collect());
        walk(self);
        self.frames.pop();
    }
}

fn for_variable(var: &VariableDeclaration<'_>) -> Vec<String> {
    let mut names = Vec::new();
    for declarator in &var.declarations {
        binding_names(&declarator.id, &mut names);
    }
    names
}

impl<'a> Visit<'a> for ReferenceCollector {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        self.reference(ident.name.as_str());
    }

    /// `<Foo />` and `<Foo.Bar />` reach `visit_identifier_reference`; plain
    /// lowercase tags are JSX identifiers and are counted here.
    fn visit_jsx_element_name(&mut self, name: &JSXElementName<'a>) {
        if let JSXElementName::Identifier(ident) = name {
            self.reference(ident.name.as_str());
        }
        walk::walk_jsx_element_name(self, name);
    }

    fn visit_import_declaration(&mut self, _decl: &ImportDeclaration<'a>) {}

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if let Some(declaration) = &decl.declaration {
            self.visit_declaration(declaration);
        }
        // `export { a as b } from 'm'` names bindings of another module.
        if decl.source.is_some() {
            return;
        }
        for specifier in &decl.specifiers {
            if let ModuleExportName::IdentifierReference(local) = &specifier.local {
                self.visit_identifier_reference(local);
            }
        }
    }

    fn visit_function(&mut self, func: &Function<'a>, _flags: ScopeFlags) {
        let mut names = Vec::new();
        if func.is_expression() {
            names.extend(func.id.as_ref().map(|id| id.name.to_string()));
        }
        type_parameter_names(func.type_parameters.as_deref(), &mut names);
        parameter_names(&func.params, &mut names);

        // Parameter defaults see the parameters but not the body's bindings.
        self.scoped(names, |this| {
            if let Some(type_parameters) = &func.type_parameters {
                this.visit_ts_type_parameter_declaration(type_parameters);
            }
            if let Some(this_param) = &func.this_param {
                this.visit_ts_this_parameter(this_param);
            }
            this.visit_formal_parameters(&func.params);
            if let Some(return_type) = &func.return_type {
                this.visit_ts_type_annotation(return_type);
            }
            if let Some(body) = &func.body {
                let mut locals = Vec::new();
                scope_names(&body.statements, &mut locals);
                hoisted_vars(&body.statements, &mut locals);
                this.scoped(locals, |this| this.visit_function_body(body));
            }
        });
    }

    fn visit_arrow_function_expression(&mut self, arrow: &ArrowFunctionExpression<'a>) {
        let mut names = Vec::new();
        type_parameter_names(arrow.type_parameters.as_deref(), &mut names);
        parameter_names(&arrow.params, &mut names);

        self.scoped(names, |this| {
            if let Some(type_parameters) = &arrow.type_parameters {
                this.visit_ts_type_parameter_declaration(type_parameters);
            }
            this.visit_formal_parameters(&arrow.params);
            if let Some(return_type) = &arrow.return_type {
                this.visit_ts_type_annotation(return_type);
            }
            let mut locals = Vec::new();
            scope_names(&arrow.body.statements, &mut locals);
            hoisted_vars(&arrow.body.statements, &mut locals);
            this.scoped(locals, |this| this.visit_function_body(&arrow.body));
        });
    }

    fn visit_class(&mut self, class: &Class<'a>) {
        let mut names = Vec::new();
        names.extend(class.id.as_ref().map(|id| id.name.to_string()));
        type_parameter_names(class.type_parameters.as_deref(), &mut names);
        self.scoped(names, |this| walk::walk_class(this, class));
    }

    fn visit_static_block(&mut self, block: &StaticBlock<'a>) {
        let mut names = Vec::new();
        scope_names(&block.body, &mut names);
        hoisted_vars(&block.body, &mut names);
        self.scoped(names, |this| walk::walk_static_block(this, block));
    }

    fn visit_block_statement(&mut self, block: &BlockStatement<'a>) {
        let mut names = Vec::new();
        scope_names(&block.body, &mut names);
        self.scoped(names, |this| walk::walk_block_statement(this, block));
    }

    fn visit_for_statement(&mut self, stmt: &ForStatement<'a>) {
        let names = match &stmt.init {
            Some(ForStatementInit::VariableDeclaration(var)) => for_variable(var),
            _ => Vec::new(),
        };
        self.scoped(names, |this| walk::walk_for_statement(this, stmt));
    }

    fn visit_for_in_statement(&mut self, stmt: &ForInStatement<'a>) {
        let names = match &stmt.left {
            ForStatementLeft::VariableDeclaration(var) => for_variable(var),
            _ => Vec::new(),
        };
        self.scoped(names, |this| walk::walk_for_in_statement(this, stmt));
    }

    fn visit_for_of_statement(&mut self, stmt: &ForOfStatement<'a>) {
        let names = match &stmt.left {
            ForStatementLeft::VariableDeclaration(var) => for_variable(var),
            _ => Vec::new(),
        };
        self.scoped(names, |this| walk::walk_for_of_statement(this, stmt));
    }

    fn visit_catch_clause(&mut self, clause: &CatchClause<'a>) {
        let mut names = Vec::new();
        if let Some(param) = &clause.param {
            binding_names(&param.pattern, &mut names);
        }
        self.scoped(names, |this| walk::walk_catch_clause(this, clause));
    }

    fn visit_switch_statement(&mut self, stmt: &SwitchStatement<'a>) {
        self.visit_expression(&stmt.discriminant);
        let mut names = Vec::new();
        for case in &stmt.cases {
            scope_names(&case.consequent, &mut names);
        }
        self.scoped(names, |this| {
            for case in &stmt.cases {
                this.visit_switch_case(case);
            }
        });
    }

    fn visit_ts_type_alias_declaration(&mut self, decl: &TSTypeAliasDeclaration<'a>) {
        let mut names = Vec::new();
        type_parameter_names(decl.type_parameters.as_deref(), &mut names);
        self.scoped(names, |this| walk::walk_ts_type_alias_declaration(this, decl));
    }

    fn visit_ts_interface_declaration(&mut self, decl: &TSInterfaceDeclaration<'a>) {
        let mut names = Vec::new();
        type_parameter_names(decl.type_parameters.as_deref(), &mut names);
        self.scoped(names, |this| walk::walk_ts_interface_declaration(this, decl));
    }
}
