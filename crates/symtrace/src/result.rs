//! Trace output: per-declaration consumer sets and run summaries.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};

use crate::index::Indices;
use crate::node::{NodeId, TopLevelNode};

/// Consumers of one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyResult {
    /// Other nodes of the declaring file that use a declared name.
    pub internal: BTreeSet<NodeId>,
    /// Nodes of other files reached through imports and re-export chains.
    pub external: BTreeSet<NodeId>,
    /// `export ... from` nodes the trace passed through.
    pub reexports: BTreeSet<NodeId>,
    /// The trace stopped at the depth limit; `external` may be incomplete.
    pub truncated: bool,
}

impl DependencyResult {
    /// No consumer anywhere.
    pub fn is_orphaned(&self) -> bool {
        self.internal.is_empty() && self.external.is_empty()
    }

    /// Internal then external consumer ids.
    pub fn consumers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.internal.iter().chain(&self.external).copied()
    }
}

/// Result of tracing every declaration of an [`Indices`] snapshot.
#[derive(Debug, Clone, Default)]
pub struct TraceResult {
    pub(crate) results: IndexMap<NodeId, DependencyResult, FxBuildHasher>,
    pub(crate) owners: FxHashMap<NodeId, PathBuf>,
    pub(crate) approximate_fragments: usize,
}

impl TraceResult {
    pub fn get(&self, id: NodeId) -> Option<&DependencyResult> {
        self.results.get(&id)
    }

    /// Results in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DependencyResult)> {
        self.results.iter().map(|(id, result)| (*id, result))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// File owning any node of the traced project.
    pub fn owner_file(&self, id: NodeId) -> Option<&Path> {
        self.owners.get(&id).map(PathBuf::as_path)
    }

    /// External consumers of `declaration`, grouped by file.
    pub fn consumers_by_file(&self, declaration: NodeId) -> BTreeMap<&Path, Vec<NodeId>> {
        let mut grouped: BTreeMap<&Path, Vec<NodeId>> = BTreeMap::new();
        let Some(result) = self.results.get(&declaration) else {
            return grouped;
        };
        for &id in &result.external {
            if let Some(file) = self.owner_file(id) {
                grouped.entry(file).or_default().push(id);
            }
        }
        grouped
    }

    /// Fragments that were matched lexically because they did not parse.
    pub fn approximate_fragments(&self) -> usize {
        self.approximate_fragments
    }

    /// Join results with their declaration nodes.
    pub fn declaration_map(&self, indices: &Indices) -> DeclarationMap {
        indices
            .declarations()
            .iter()
            .map(|(&id, node)| {
                let traced = TracedDeclaration {
                    node: Arc::clone(node),
                    dependencies: self.results.get(&id).cloned().unwrap_or_default(),
                };
                (id, traced)
            })
            .collect()
    }
}

/// A declaration together with its consumers.
#[derive(Debug, Clone, Serialize)]
pub struct TracedDeclaration {
    pub node: Arc<TopLevelNode>,
    pub dependencies: DependencyResult,
}

/// Declarations index augmented with dependency results.
pub type DeclarationMap = IndexMap<NodeId, TracedDeclaration, FxBuildHasher>;

/// Counts describing one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSummary {
    pub declarations: usize,
    pub with_internal: usize,
    pub with_external: usize,
    /// Declarations with neither internal nor external consumers.
    pub orphaned: usize,
    pub skipped_files: usize,
    pub approximate_fragments: usize,
    pub truncated: usize,
}

impl TraceSummary {
    pub fn new(trace: &TraceResult, indices: &Indices) -> Self {
        let mut summary = Self {
            declarations: trace.len(),
            skipped_files: indices.warnings().len(),
            approximate_fragments: trace.approximate_fragments(),
            ..Self::default()
        };
        for (_, result) in trace.iter() {
            summary.with_internal += usize::from(!result.internal.is_empty());
            summary.with_external += usize::from(!result.external.is_empty());
            summary.orphaned += usize::from(result.is_orphaned());
            summary.truncated += usize::from(result.truncated);
        }
        summary
    }
}

impl fmt::Display for TraceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Declarations:          {}", self.declarations)?;
        writeln!(f, "  with internal users: {}", self.with_internal)?;
        writeln!(f, "  with external users: {}", self.with_external)?;
        writeln!(f, "  orphaned:            {}", self.orphaned)?;
        writeln!(f, "Skipped files:         {}", self.skipped_files)?;
        writeln!(f, "Approximate fragments: {}", self.approximate_fragments)?;
        write!(f, "Truncated traces:      {}", self.truncated)
    }
}
