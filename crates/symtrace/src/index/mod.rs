//! Module indices: every top-level node, keyed by [`NodeId`], plus the
//! imports, exports and declarations subsets.
//!
//! Indices are built once by [`ModuleIndexer`] and are read-only afterwards.
//! A node present in several indices is the same `Arc` in each.

mod indexer;

pub use indexer::ModuleIndexer;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::Serialize;

use crate::node::{NodeId, TopLevelNode};
use crate::resolver::ResolvedModule;
use crate::source::{SourceFile, SourceType};

/// Insertion-ordered node map.
pub type NodeMap = IndexMap<NodeId, Arc<TopLevelNode>, FxBuildHasher>;

/// Per-file record.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub source: SourceFile,
    pub source_type: SourceType,
    /// Node ids in statement order.
    pub nodes: Vec<NodeId>,
}

/// Why a file contributed no nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum IndexWarningKind {
    #[error("failed to read file: {0}")]
    Read(String),

    #[error("file is {size} bytes, above the {max} byte limit")]
    TooLarge { size: u64, max: usize },

    #[error("file is not valid UTF-8")]
    InvalidUtf8,

    #[error("unsupported source type")]
    Unsupported,

    #[error("parse error: {0}")]
    Parse(String),
}

/// A non-fatal indexing problem: the file was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{}: {kind}", .path.display())]
pub struct IndexWarning {
    pub path: PathBuf,
    pub kind: IndexWarningKind,
}

#[derive(Debug, Default, Clone)]
pub struct Indices {
    pub(crate) project: NodeMap,
    pub(crate) imports: NodeMap,
    pub(crate) exports: NodeMap,
    pub(crate) declarations: NodeMap,
    pub(crate) files: IndexMap<PathBuf, FileEntry, FxBuildHasher>,
    pub(crate) resolutions: FxHashMap<NodeId, ResolvedModule>,
    pub(crate) warnings: Vec<IndexWarning>,
}

impl Indices {
    /// Every top-level node.
    pub fn project(&self) -> &NodeMap {
        &self.project
    }

    /// Import statements and static requires.
    pub fn imports(&self) -> &NodeMap {
        &self.imports
    }

    /// Export statements of every form.
    pub fn exports(&self) -> &NodeMap {
        &self.exports
    }

    /// Nodes binding at least one name, plus CommonJS export assignments.
    pub fn declarations(&self) -> &NodeMap {
        &self.declarations
    }

    pub fn node(&self, id: NodeId) -> Option<&Arc<TopLevelNode>> {
        self.project.get(&id)
    }

    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.values()
    }

    pub fn file(&self, path: &Path) -> Option<&FileEntry> {
        self.files.get(path)
    }

    /// Where the module specifier of an import/require/re-export node points.
    pub fn resolution(&self, id: NodeId) -> Option<&ResolvedModule> {
        self.resolutions.get(&id)
    }

    pub fn warnings(&self) -> &[IndexWarning] {
        &self.warnings
    }

    /// Declarations in `file` binding `name`.
    pub fn declarations_named<'a>(
        &'a self,
        file: &'a Path,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<TopLevelNode>> + 'a {
        self.declarations
            .values()
            .filter(move |node| node.file == file && node.declared_names().iter().any(|n| n == name))
    }

    pub fn len(&self) -> usize {
        self.project.len()
    }

    pub fn is_empty(&self) -> bool {
        self.project.is_empty()
    }

    /// Insert a node into `project` and every index its kind belongs to.
    pub(crate) fn insert(&mut self, node: TopLevelNode) {
        let node = Arc::new(node);
        let id = node.id;
        if node.kind.is_import() {
            self.imports.insert(id, Arc::clone(&node));
        }
        if node.kind.is_export() {
            self.exports.insert(id, Arc::clone(&node));
        }
        if node.kind.is_declaration() {
            self.declarations.insert(id, Arc::clone(&node));
        }
        self.project.insert(id, node);
    }
}
