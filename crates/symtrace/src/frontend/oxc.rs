//! Front end built on the oxc parser.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingPattern, BindingPatternKind, Declaration, ExportAllDeclaration,
    ExportDefaultDeclaration, ExportDefaultDeclarationKind, ExportNamedDeclaration, Expression,
    ImportDeclaration, ImportDeclarationSpecifier, ObjectPropertyKind, Statement,
    TSImportEqualsDeclaration, TSModuleDeclarationName, TSModuleReference, VariableDeclaration,
};
use oxc_parser::{Parser, ParserReturn};
use oxc_span::{GetSpan, SourceType as OxcSourceType};

use super::patterns::{
    CommonJsTarget, RequireCall, binding_names, commonjs_target, identifier_name,
    module_export_name, require_call,
};
use super::{FrontEndError, StatementDescriptor, SyntaxFrontEnd};
use crate::node::{
    DEFAULT_EXPORT, ExportedName, ImportClause, ImportKind, ImportSpecifier, NodeKind, TextSpan,
    WILDCARD,
};
use crate::source::SourceType;

/// Convert our SourceType to oxc's, picking the parser dialect.
///
/// Plain `.js` files are parsed as ES modules with JSX enabled.
pub(crate) fn oxc_source_type(source_type: SourceType, path: Option<&Path>) -> OxcSourceType {
    let is_ext = |ext: &str| {
        path.and_then(|p| p.extension())
            .is_some_and(|actual| actual == ext)
    };
    match source_type {
        SourceType::JavaScript if is_ext("cjs") => path
            .and_then(|p| OxcSourceType::from_path(p).ok())
            .unwrap_or(OxcSourceType::jsx()),
        SourceType::JavaScript | SourceType::Jsx => OxcSourceType::jsx(),
        SourceType::TypeScript => path
            .and_then(|p| OxcSourceType::from_path(p).ok())
            .unwrap_or(OxcSourceType::ts()),
        SourceType::Tsx => OxcSourceType::tsx(),
        SourceType::Json | SourceType::Unknown => OxcSourceType::mjs(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OxcFrontEnd;

impl OxcFrontEnd {
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxFrontEnd for OxcFrontEnd {
    fn parse_statements(
        &self,
        source: &str,
        source_type: SourceType,
        path: &Path,
    ) -> Result<Vec<StatementDescriptor>, FrontEndError> {
        if !source_type.is_javascript_like() {
            return Err(FrontEndError::Unsupported {
                path: path.to_path_buf(),
                source_type,
            });
        }

        let allocator = Allocator::default();
        let ParserReturn {
            program,
            errors,
            panicked,
            ..
        } = Parser::new(&allocator, source, oxc_source_type(source_type, Some(path))).parse();

        if panicked || !errors.is_empty() {
            let message = errors
                .first()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "parser aborted".to_string());
            return Err(FrontEndError::Parse {
                path: path.to_path_buf(),
                message,
            });
        }

        let mut lines = LineCounter::new(source);
        let statements = program
            .body
            .iter()
            .map(|stmt| {
                let span = stmt.span();
                let (syntax, is_type_only) = classify(stmt);
                StatementDescriptor {
                    span: TextSpan::new(span.start, span.end, lines.line_at(span.start)),
                    text: span.source_text(source).to_string(),
                    syntax,
                    is_type_only,
                }
            })
            .collect();

        Ok(statements)
    }
}

/// Incremental 1-based line lookup for increasing offsets.
struct LineCounter<'s> {
    bytes: &'s [u8],
    offset: usize,
    line: u32,
}

impl<'s> LineCounter<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            bytes: source.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, offset: u32) -> u32 {
        let offset = (offset as usize).min(self.bytes.len());
        if offset > self.offset {
            self.line += memchr::memchr_iter(b'\n', &self.bytes[self.offset..offset]).count() as u32;
            self.offset = offset;
        }
        self.line
    }
}

fn classify(stmt: &Statement<'_>) -> (NodeKind, bool) {
    match stmt {
        Statement::ImportDeclaration(import) => (import_statement(import), import.import_kind.is_type()),
        Statement::TSImportEqualsDeclaration(decl) => (import_equals(decl), decl.import_kind.is_type()),
        Statement::ExportNamedDeclaration(export) => {
            (export_named(export), export.export_kind.is_type())
        }
        Statement::ExportDefaultDeclaration(export) => (export_default(export), false),
        Statement::ExportAllDeclaration(export) => (export_all(export), export.export_kind.is_type()),
        Statement::TSExportAssignment(assign) => (
            commonjs_module_value(&assign.expression, false),
            false,
        ),
        Statement::VariableDeclaration(var) => (variable_statement(var), false),
        Statement::ExpressionStatement(expr) => (commonjs_statement(&expr.expression), false),
        other => match other.as_declaration() {
            Some(decl) => (
                NodeKind::Declaration {
                    declared: declaration_names(decl),
                },
                false,
            ),
            None => (NodeKind::Other, false),
        },
    }
}

fn import_statement(import: &ImportDeclaration<'_>) -> NodeKind {
    let specifiers = import
        .specifiers
        .iter()
        .flatten()
        .map(|spec| match spec {
            ImportDeclarationSpecifier::ImportDefaultSpecifier(default) => {
                ImportSpecifier::new(ImportKind::Default, default.local.name.as_str(), DEFAULT_EXPORT)
            }
            ImportDeclarationSpecifier::ImportNamespaceSpecifier(ns) => {
                ImportSpecifier::new(ImportKind::Namespace, ns.local.name.as_str(), WILDCARD)
            }
            ImportDeclarationSpecifier::ImportSpecifier(named) => ImportSpecifier::new(
                ImportKind::Named,
                named.local.name.as_str(),
                module_export_name(&named.imported),
            ),
        })
        .collect();

    NodeKind::Import(ImportClause {
        source: import.source.value.to_string(),
        specifiers,
    })
}

fn import_equals(decl: &TSImportEqualsDeclaration<'_>) -> NodeKind {
    match &decl.module_reference {
        TSModuleReference::ExternalModuleReference(external) => NodeKind::Import(ImportClause {
            source: external.expression.value.to_string(),
            specifiers: vec![ImportSpecifier::new(
                ImportKind::RequireDefault,
                decl.id.name.as_str(),
                WILDCARD,
            )],
        }),
        // `import x = A.B` is a local alias.
        _ => NodeKind::Declaration {
            declared: vec![decl.id.name.to_string()],
        },
    }
}

fn declaration_names(decl: &Declaration<'_>) -> Vec<String> {
    let mut names = Vec::new();
    match decl {
        Declaration::VariableDeclaration(var) => {
            for declarator in &var.declarations {
                binding_names(&declarator.id, &mut names);
            }
        }
        Declaration::FunctionDeclaration(func) => {
            names.extend(func.id.as_ref().map(|id| id.name.to_string()));
        }
        Declaration::ClassDeclaration(class) => {
            names.extend(class.id.as_ref().map(|id| id.name.to_string()));
        }
        Declaration::TSTypeAliasDeclaration(alias) => names.push(alias.id.name.to_string()),
        Declaration::TSInterfaceDeclaration(interface) => {
            names.push(interface.id.name.to_string());
        }
        Declaration::TSEnumDeclaration(decl) => names.push(decl.id.name.to_string()),
        Declaration::TSModuleDeclaration(module) => {
            if let TSModuleDeclarationName::Identifier(id) = &module.id {
                names.push(id.name.to_string());
            }
        }
        Declaration::TSImportEqualsDeclaration(decl) => names.push(decl.id.name.to_string()),
        #[allow(unreachable_patterns)]
        _ => {}
    }
    names
}

fn export_named(export: &ExportNamedDeclaration<'_>) -> NodeKind {
    if let Some(source) = &export.source {
        return NodeKind::ReExport {
            exported: export
                .specifiers
                .iter()
                .map(|spec| {
                    ExportedName::new(module_export_name(&spec.local), module_export_name(&spec.exported))
                })
                .collect(),
            source: source.value.to_string(),
        };
    }

    if let Some(decl) = &export.declaration {
        if let Some(NodeKind::Require { declared, import, .. }) = exported_require(decl) {
            let exported = declared.iter().map(ExportedName::same).collect();
            return NodeKind::Require {
                declared,
                import,
                exported,
            };
        }
        let declared = declaration_names(decl);
        let exported = declared.iter().map(ExportedName::same).collect();
        return NodeKind::ExportedDeclaration {
            declared,
            exported,
            is_default: false,
        };
    }

    NodeKind::LocalExport {
        exported: export
            .specifiers
            .iter()
            .map(|spec| {
                ExportedName::new(module_export_name(&spec.local), module_export_name(&spec.exported))
            })
            .collect(),
        is_default: false,
    }
}

/// `export const x = require('m')` and `export import x = require('m')`.
fn exported_require(decl: &Declaration<'_>) -> Option<NodeKind> {
    match decl {
        Declaration::VariableDeclaration(var) => {
            Some(variable_statement(var)).filter(|kind| matches!(kind, NodeKind::Require { .. }))
        }
        Declaration::TSImportEqualsDeclaration(decl) => match import_equals(decl) {
            NodeKind::Import(import) => Some(NodeKind::Require {
                declared: vec![decl.id.name.to_string()],
                import,
                exported: Vec::new(),
            }),
            _ => None,
        },
        _ => None,
    }
}

fn default_declaration(name: Option<String>) -> NodeKind {
    let name = name.unwrap_or_else(|| DEFAULT_EXPORT.to_string());
    NodeKind::ExportedDeclaration {
        exported: vec![ExportedName::new(name.as_str(), DEFAULT_EXPORT)],
        declared: vec![name],
        is_default: true,
    }
}

fn export_default(export: &ExportDefaultDeclaration<'_>) -> NodeKind {
    match &export.declaration {
        ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
            default_declaration(func.id.as_ref().map(|id| id.name.to_string()))
        }
        ExportDefaultDeclarationKind::ClassDeclaration(class) => {
            default_declaration(class.id.as_ref().map(|id| id.name.to_string()))
        }
        ExportDefaultDeclarationKind::TSInterfaceDeclaration(interface) => {
            default_declaration(Some(interface.id.name.to_string()))
        }
        other => match other.as_expression().and_then(identifier_name) {
            Some(local) => NodeKind::LocalExport {
                exported: vec![ExportedName::new(local, DEFAULT_EXPORT)],
                is_default: true,
            },
            None => default_declaration(None),
        },
    }
}

fn export_all(export: &ExportAllDeclaration<'_>) -> NodeKind {
    let exported = export
        .exported
        .as_ref()
        .map(module_export_name)
        .unwrap_or_else(|| WILDCARD.to_string());
    NodeKind::ReExport {
        exported: vec![ExportedName::new(WILDCARD, exported)],
        source: export.source.value.to_string(),
    }
}

fn variable_statement(var: &VariableDeclaration<'_>) -> NodeKind {
    let mut declared = Vec::new();
    let mut import: Option<ImportClause> = None;

    for declarator in &var.declarations {
        binding_names(&declarator.id, &mut declared);
        let Some(call) = declarator.init.as_ref().and_then(require_call) else {
            continue;
        };
        let clause = import.get_or_insert_with(|| ImportClause {
            source: call.source().to_string(),
            specifiers: Vec::new(),
        });
        // One statement records one module; later requires of other modules
        // only declare names.
        if clause.source == call.source() {
            require_specifiers(&declarator.id, &call, &mut clause.specifiers);
        }
    }

    match import {
        Some(import) => NodeKind::Require {
            declared,
            import,
            exported: Vec::new(),
        },
        None => NodeKind::Declaration { declared },
    }
}

fn require_specifiers(pattern: &BindingPattern<'_>, call: &RequireCall, out: &mut Vec<ImportSpecifier>) {
    let mut names = Vec::new();
    match (call, &pattern.kind) {
        (RequireCall::Member { property, .. }, _) => {
            binding_names(pattern, &mut names);
            out.extend(
                names
                    .into_iter()
                    .map(|local| ImportSpecifier::new(ImportKind::RequireNamed, local, property.as_str())),
            );
        }
        (RequireCall::Whole { .. }, BindingPatternKind::ObjectPattern(object)) => {
            for property in &object.properties {
                // Computed keys cannot be matched to an export.
                let Some(key) = property.key.static_name() else {
                    continue;
                };
                let mut inner = Vec::new();
                binding_names(&property.value, &mut inner);
                out.extend(
                    inner
                        .into_iter()
                        .map(|local| ImportSpecifier::new(ImportKind::RequireNamed, local, key.as_ref())),
                );
            }
            if let Some(rest) = &object.rest {
                binding_names(&rest.argument, &mut names);
                out.extend(
                    names
                        .into_iter()
                        .map(|local| ImportSpecifier::new(ImportKind::RequireDefault, local, WILDCARD)),
                );
            }
        }
        (RequireCall::Whole { .. }, _) => {
            binding_names(pattern, &mut names);
            out.extend(
                names
                    .into_iter()
                    .map(|local| ImportSpecifier::new(ImportKind::RequireDefault, local, WILDCARD)),
            );
        }
    }
}

fn commonjs_statement(expr: &Expression<'_>) -> NodeKind {
    let Expression::AssignmentExpression(assign) = expr.without_parentheses() else {
        return NodeKind::Other;
    };
    match commonjs_target(&assign.left) {
        Some(CommonJsTarget::Module) => commonjs_module_value(&assign.right, true),
        Some(CommonJsTarget::Property(key)) => match identifier_name(&assign.right) {
            Some(local) => NodeKind::CommonJsExport {
                declared: Vec::new(),
                exported: vec![ExportedName::new(local, key)],
            },
            None => NodeKind::CommonJsExport {
                declared: vec![key.clone()],
                exported: vec![ExportedName::same(key)],
            },
        },
        None => NodeKind::Other,
    }
}

/// `module.exports = value` (or TS `export = value`).
fn commonjs_module_value(value: &Expression<'_>, expand_objects: bool) -> NodeKind {
    if let Some(local) = identifier_name(value) {
        return NodeKind::CommonJsExport {
            declared: Vec::new(),
            exported: vec![ExportedName::new(local, DEFAULT_EXPORT)],
        };
    }

    if let (true, Expression::ObjectExpression(object)) = (expand_objects, value.without_parentheses()) {
        let mut declared = Vec::new();
        let mut exported = Vec::new();
        for property in &object.properties {
            let ObjectPropertyKind::ObjectProperty(property) = property else {
                continue;
            };
            let Some(key) = property.key.static_name() else {
                continue;
            };
            let key = key.to_string();
            if property.shorthand {
                exported.push(ExportedName::same(key));
            } else if let Some(local) = identifier_name(&property.value) {
                exported.push(ExportedName::new(local, key));
            } else {
                declared.push(key.clone());
                exported.push(ExportedName::same(key));
            }
        }
        return NodeKind::CommonJsExport { declared, exported };
    }

    NodeKind::CommonJsExport {
        declared: vec![DEFAULT_EXPORT.to_string()],
        exported: vec![ExportedName::same(DEFAULT_EXPORT)],
    }
}
