//! Cross-module dependency tracing.
//!
//! For every declaration the tracer collects:
//! - internal consumers: other nodes of the same file using a declared name
//! - external consumers: nodes of other files reaching the declaration
//!   through imports, local re-exports, `export ... from` chains, namespace
//!   imports and CommonJS requires
//!
//! Every node is parsed once up front; declarations are then traced in
//! parallel against read-only lookup tables. Within one declaration each
//! `(file, exported name)` pair is explored once, even inside dense
//! `export *` cycles.

mod external;
mod lookup;
mod visited;

pub use external::Exploration;
pub use visited::VisitedSet;

use rayon::prelude::*;
use symtrace_config::DEFAULT_MAX_TRACE_DEPTH;

use crate::index::Indices;
use crate::node::{DEFAULT_EXPORT, NodeId, TopLevelNode};
use crate::result::{DependencyResult, TraceResult};

use external::Explored;
use lookup::TraceLookup;

/// Trace every declaration with the default depth limit.
pub fn trace_all(indices: &Indices) -> TraceResult {
    DependencyTracer::new(indices).trace_all()
}

pub struct DependencyTracer<'a> {
    indices: &'a Indices,
    lookup: TraceLookup<'a>,
    max_depth: usize,
}

impl<'a> DependencyTracer<'a> {
    /// Build lookup tables and parse every node of `indices`.
    pub fn new(indices: &'a Indices) -> Self {
        Self {
            indices,
            lookup: TraceLookup::build(indices),
            max_depth: DEFAULT_MAX_TRACE_DEPTH,
        }
    }

    /// Maximum number of `(file, name)` hops a single exploration may take.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn indices(&self) -> &'a Indices {
        self.indices
    }

    pub fn trace_all(&self) -> TraceResult {
        let declarations: Vec<&'a TopLevelNode> = self
            .indices
            .declarations()
            .values()
            .map(|node| node.as_ref())
            .collect();

        let traced: Vec<DependencyResult> = declarations
            .par_iter()
            .map(|&node| self.trace_declaration(node))
            .collect();

        let results = declarations.iter().map(|node| node.id).zip(traced).collect();
        let owners = self
            .indices
            .project()
            .iter()
            .map(|(&id, node)| (id, node.file.clone()))
            .collect();

        let trace = TraceResult {
            results,
            owners,
            approximate_fragments: self.lookup.approximate_fragments(),
        };
        tracing::info!(
            declarations = trace.len(),
            approximate_fragments = trace.approximate_fragments(),
            "Tracing complete"
        );
        trace
    }

    /// Consumers of one declaration.
    pub fn trace_declaration(&self, node: &'a TopLevelNode) -> DependencyResult {
        let file = node.file();
        let mut result = DependencyResult::default();

        if let Some(entry) = self.indices.file(file) {
            for name in node.declared_names() {
                if name == DEFAULT_EXPORT {
                    continue;
                }
                result.internal.extend(
                    entry
                        .nodes
                        .iter()
                        .copied()
                        .filter(|&id| id != node.id && self.lookup.references(id, name)),
                );
            }
        }

        let mut explored = Explored::default();
        let mut found = Exploration::default();
        for alias in self.lookup.export_aliases(self.indices, node) {
            tracing::trace!(local = alias.local, exported = alias.exported, "Following export");
            self.explore(alias.exported, file, &VisitedSet::new(), &mut explored, &mut found);
        }
        result.external = found.consumers;
        result.reexports = found.reexports;
        result.truncated = found.truncated;

        let foreign = |id: &NodeId| {
            self.indices.node(*id).is_some_and(|other| other.file() != file)
        };
        result.external.retain(&foreign);
        result.reexports.retain(&foreign);

        tracing::debug!(
            id = %node.id,
            names = ?node.declared_names(),
            internal = result.internal.len(),
            external = result.external.len(),
            "Traced declaration"
        );
        result
    }
}
