//! Top-level node records produced by the module indexer.
//!
//! Every statement at module scope becomes one [`TopLevelNode`]. Its syntactic
//! category is a [`NodeKind`] variant carrying only the fields that category
//! needs; index membership is derived from the variant.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::source::SourceType;

/// Exported/imported name used for default exports.
pub const DEFAULT_EXPORT: &str = "default";

/// Name used for wildcard re-exports and whole-module imports.
pub const WILDCARD: &str = "*";

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a top-level node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Reserve `count` consecutive ids and return the first one.
    ///
    /// Ids within a block are handed out in order, so a single indexing run
    /// numbers its nodes deterministically.
    pub(crate) fn allocate_block(count: usize) -> u64 {
        NEXT_NODE_ID.fetch_add(count as u64, Ordering::Relaxed)
    }

    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source range of a statement. `line` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: u32,
    pub end: u32,
    pub line: u32,
}

impl TextSpan {
    pub fn new(start: u32, end: u32, line: u32) -> Self {
        Self { start, end, line }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportKind {
    /// `import x from 'm'`
    Default,
    /// `import * as x from 'm'`
    Namespace,
    /// `import { a as x } from 'm'`
    Named,
    /// `const x = require('m')`, `import x = require('m')`
    RequireDefault,
    /// `const { a: x } = require('m')`, `const x = require('m').a`
    RequireNamed,
}

impl ImportKind {
    /// Whole-module bindings match every exported name.
    pub fn is_whole_module(self) -> bool {
        matches!(self, Self::Namespace | Self::RequireDefault)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpecifier {
    pub kind: ImportKind,
    /// Binding name in the importing file.
    pub local: String,
    /// Name requested from the source module (`*` for whole-module bindings).
    pub imported: String,
}

impl ImportSpecifier {
    pub fn new(kind: ImportKind, local: impl Into<String>, imported: impl Into<String>) -> Self {
        Self {
            kind,
            local: local.into(),
            imported: imported.into(),
        }
    }

    /// Whether this binding gives access to the export named `name`.
    pub fn matches_export(&self, name: &str) -> bool {
        match self.kind {
            ImportKind::Namespace | ImportKind::RequireDefault => true,
            ImportKind::Default => name == DEFAULT_EXPORT,
            ImportKind::Named | ImportKind::RequireNamed => self.imported == name,
        }
    }
}

/// An import statement or static `require`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportClause {
    /// Raw module specifier as written.
    pub source: String,
    pub specifiers: Vec<ImportSpecifier>,
}

/// `(local, exported)` pair of an export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportedName {
    pub local: String,
    pub exported: String,
}

impl ExportedName {
    pub fn new(local: impl Into<String>, exported: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            exported: exported.into(),
        }
    }

    /// Same name on both sides.
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            local: name.clone(),
            exported: name,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.local == WILDCARD
    }
}

/// Syntactic category of a top-level statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    /// ESM import, or TS `import x = require('m')`.
    Import(ImportClause),
    /// Variable declaration initialized from a static `require`, or TS
    /// `export import x = require('m')`.
    Require {
        declared: Vec<String>,
        import: ImportClause,
        /// Set when the statement is also exported (`export const x = require('m')`).
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exported: Vec<ExportedName>,
    },
    Declaration {
        declared: Vec<String>,
    },
    /// `export <declaration>`, `export default <declaration or expression>`.
    ExportedDeclaration {
        declared: Vec<String>,
        exported: Vec<ExportedName>,
        is_default: bool,
    },
    /// `export { a as b }`, `export default a`.
    LocalExport {
        exported: Vec<ExportedName>,
        is_default: bool,
    },
    /// `export { a } from 'm'`, `export * from 'm'`, `export * as ns from 'm'`.
    ReExport {
        exported: Vec<ExportedName>,
        source: String,
    },
    /// `module.exports = …`, `exports.k = …`, TS `export = …`.
    CommonJsExport {
        declared: Vec<String>,
        exported: Vec<ExportedName>,
    },
    Other,
}

impl NodeKind {
    pub fn declared_names(&self) -> &[String] {
        match self {
            Self::Require { declared, .. }
            | Self::Declaration { declared }
            | Self::ExportedDeclaration { declared, .. }
            | Self::CommonJsExport { declared, .. } => declared,
            _ => &[],
        }
    }

    pub fn import_clause(&self) -> Option<&ImportClause> {
        match self {
            Self::Import(clause) => Some(clause),
            Self::Require { import, .. } => Some(import),
            _ => None,
        }
    }

    pub fn import_specifiers(&self) -> &[ImportSpecifier] {
        self.import_clause()
            .map(|clause| clause.specifiers.as_slice())
            .unwrap_or_default()
    }

    pub fn exported(&self) -> &[ExportedName] {
        match self {
            Self::Require { exported, .. }
            | Self::ExportedDeclaration { exported, .. }
            | Self::LocalExport { exported, .. }
            | Self::ReExport { exported, .. }
            | Self::CommonJsExport { exported, .. } => exported,
            _ => &[],
        }
    }

    pub fn reexport_source(&self) -> Option<&str> {
        match self {
            Self::ReExport { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Module specifier this statement depends on, if any.
    pub fn module_source(&self) -> Option<&str> {
        self.import_clause()
            .map(|clause| clause.source.as_str())
            .or_else(|| self.reexport_source())
    }

    pub fn is_import(&self) -> bool {
        matches!(self, Self::Import(_) | Self::Require { .. })
    }

    pub fn is_export(&self) -> bool {
        match self {
            Self::Require { exported, .. } => !exported.is_empty(),
            Self::ExportedDeclaration { .. }
            | Self::LocalExport { .. }
            | Self::ReExport { .. }
            | Self::CommonJsExport { .. } => true,
            _ => false,
        }
    }

    /// Whether the node belongs in the declarations index.
    pub fn is_declaration(&self) -> bool {
        match self {
            Self::CommonJsExport { .. } => true,
            Self::Require { declared, .. }
            | Self::Declaration { declared }
            | Self::ExportedDeclaration { declared, .. } => !declared.is_empty(),
            _ => false,
        }
    }

    pub fn is_default_export(&self) -> bool {
        match self {
            Self::ExportedDeclaration { is_default, .. } | Self::LocalExport { is_default, .. } => {
                *is_default
            }
            Self::CommonJsExport { exported, .. } => {
                exported.iter().any(|name| name.exported == DEFAULT_EXPORT)
            }
            _ => false,
        }
    }

    /// Short label used in logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Import(_) => "import",
            Self::Require { .. } => "require",
            Self::Declaration { .. } => "declaration",
            Self::ExportedDeclaration { .. } => "exported-declaration",
            Self::LocalExport { .. } => "local-export",
            Self::ReExport { .. } => "re-export",
            Self::CommonJsExport { .. } => "commonjs-export",
            Self::Other => "other",
        }
    }
}

/// One statement at module scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopLevelNode {
    pub id: NodeId,
    /// Absolute path of the owning file.
    pub file: PathBuf,
    pub kind: NodeKind,
    pub span: TextSpan,
    /// Raw statement source text.
    pub text: String,
    pub source_type: SourceType,
    /// `import type` / `export type`.
    pub is_type_only: bool,
}

impl TopLevelNode {
    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn declared_names(&self) -> &[String] {
        self.kind.declared_names()
    }

    pub fn exported(&self) -> &[ExportedName] {
        self.kind.exported()
    }

    pub fn is_exported(&self) -> bool {
        self.kind.is_export()
    }

    pub fn is_default_export(&self) -> bool {
        self.kind.is_default_export()
    }
}
