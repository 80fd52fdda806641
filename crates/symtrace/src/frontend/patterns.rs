//! AST pattern helpers shared by the front end and the scope resolver.

use oxc_ast::ast::{
    Argument, AssignmentTarget, BindingPattern, BindingPatternKind, Expression,
    FormalParameters, ModuleExportName, TSTypeParameterDeclaration,
};

/// Collect every name bound by a (possibly destructuring) pattern.
pub(crate) fn binding_names(pattern: &BindingPattern<'_>, out: &mut Vec<String>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(ident) => out.push(ident.name.to_string()),
        BindingPatternKind::ObjectPattern(object) => {
            for property in &object.properties {
                binding_names(&property.value, out);
            }
            if let Some(rest) = &object.rest {
                binding_names(&rest.argument, out);
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                binding_names(element, out);
            }
            if let Some(rest) = &array.rest {
                binding_names(&rest.argument, out);
            }
        }
        BindingPatternKind::AssignmentPattern(assign) => binding_names(&assign.left, out),
    }
}

pub(crate) fn parameter_names(params: &FormalParameters<'_>, out: &mut Vec<String>) {
    for param in &params.items {
        binding_names(&param.pattern, out);
    }
    if let Some(rest) = &params.rest {
        binding_names(&rest.argument, out);
    }
}

pub(crate) fn type_parameter_names(
    params: Option<&TSTypeParameterDeclaration<'_>>,
    out: &mut Vec<String>,
) {
    if let Some(params) = params {
        out.extend(params.params.iter().map(|param| param.name.name.to_string()));
    }
}

pub(crate) fn module_export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
        ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
    }
}

fn is_identifier(expr: &Expression<'_>, name: &str) -> bool {
    matches!(expr.without_parentheses(), Expression::Identifier(ident) if ident.name.as_str() == name)
}

pub(crate) fn identifier_name(expr: &Expression<'_>) -> Option<String> {
    match expr.without_parentheses() {
        Expression::Identifier(ident) => Some(ident.name.to_string()),
        _ => None,
    }
}

/// A static `require('m')` initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RequireCall {
    /// `require('m')`
    Whole { source: String },
    /// `require('m').k` / `require('m')['k']`
    Member { source: String, property: String },
}

impl RequireCall {
    pub(crate) fn source(&self) -> &str {
        match self {
            Self::Whole { source } | Self::Member { source, .. } => source,
        }
    }
}

fn static_require_source(expr: &Expression<'_>) -> Option<String> {
    let Expression::CallExpression(call) = expr.without_parentheses() else {
        return None;
    };
    if !is_identifier(&call.callee, "require") || call.arguments.len() != 1 {
        return None;
    }
    match &call.arguments[0] {
        Argument::StringLiteral(lit) => Some(lit.value.to_string()),
        Argument::TemplateLiteral(tpl) if tpl.expressions.is_empty() && tpl.quasis.len() == 1 => {
            tpl.quasis[0].value.cooked.as_ref().map(|cooked| cooked.to_string())
        }
        _ => None,
    }
}

pub(crate) fn require_call(expr: &Expression<'_>) -> Option<RequireCall> {
    match expr.without_parentheses() {
        Expression::StaticMemberExpression(member) => {
            static_require_source(&member.object).map(|source| RequireCall::Member {
                source,
                property: member.property.name.to_string(),
            })
        }
        Expression::ComputedMemberExpression(member) => match &member.expression {
            Expression::StringLiteral(key) => {
                static_require_source(&member.object).map(|source| RequireCall::Member {
                    source,
                    property: key.value.to_string(),
                })
            }
            _ => None,
        },
        other => static_require_source(other).map(|source| RequireCall::Whole { source }),
    }
}

/// Target of a CommonJS export assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CommonJsTarget {
    /// `module.exports`
    Module,
    /// `exports.k`, `module.exports.k`, `exports['k']`
    Property(String),
}

fn is_module_exports(expr: &Expression<'_>) -> bool {
    match expr.without_parentheses() {
        Expression::StaticMemberExpression(member) => {
            member.property.name.as_str() == "exports" && is_identifier(&member.object, "module")
        }
        _ => false,
    }
}

fn is_exports_object(expr: &Expression<'_>) -> bool {
    is_identifier(expr, "exports") || is_module_exports(expr)
}

pub(crate) fn commonjs_target(target: &AssignmentTarget<'_>) -> Option<CommonJsTarget> {
    match target {
        AssignmentTarget::StaticMemberExpression(member) => {
            if member.property.name.as_str() == "exports" && is_identifier(&member.object, "module") {
                Some(CommonJsTarget::Module)
            } else if is_exports_object(&member.object) {
                Some(CommonJsTarget::Property(member.property.name.to_string()))
            } else {
                None
            }
        }
        AssignmentTarget::ComputedMemberExpression(member) => match &member.expression {
            Expression::StringLiteral(key) if is_exports_object(&member.object) => {
                Some(CommonJsTarget::Property(key.value.to_string()))
            }
            _ => None,
        },
        _ => None,
    }
}
