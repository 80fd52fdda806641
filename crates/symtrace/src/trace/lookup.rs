//! Read-only lookup tables built once per trace run.

use std::path::Path;

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::index::Indices;
use crate::node::{NodeId, NodeKind, TopLevelNode};
use crate::scope::{FragmentReferences, ResolutionMode, ScopeResolver};

/// An export name through which a declared name is visible to importers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExportAlias<'a> {
    pub(crate) local: &'a str,
    pub(crate) exported: &'a str,
}

pub(crate) struct TraceLookup<'a> {
    /// Target file -> import/require nodes resolving to it.
    pub(crate) importers: FxHashMap<&'a Path, Vec<NodeId>>,
    /// Source file -> `export ... from` nodes forwarding it.
    pub(crate) reexporters: FxHashMap<&'a Path, Vec<NodeId>>,
    /// File -> `export { a }` and CommonJS export nodes in it.
    pub(crate) forwarders: FxHashMap<&'a Path, Vec<NodeId>>,
    /// Parsed references of every node.
    pub(crate) references: FxHashMap<NodeId, FragmentReferences<'a>>,
}

impl<'a> TraceLookup<'a> {
    pub(crate) fn build(indices: &'a Indices) -> Self {
        let mut importers: FxHashMap<&'a Path, Vec<NodeId>> = FxHashMap::default();
        let mut reexporters: FxHashMap<&'a Path, Vec<NodeId>> = FxHashMap::default();
        let mut forwarders: FxHashMap<&'a Path, Vec<NodeId>> = FxHashMap::default();

        for (&id, node) in indices.project() {
            match &node.kind {
                NodeKind::LocalExport { .. } | NodeKind::CommonJsExport { .. } => {
                    forwarders.entry(node.file()).or_default().push(id);
                }
                NodeKind::Import(_) | NodeKind::Require { .. } | NodeKind::ReExport { .. } => {
                    let Some(target) = indices.resolution(id).and_then(|r| r.local_path()) else {
                        continue;
                    };
                    let table = if node.kind.is_import() {
                        &mut importers
                    } else {
                        &mut reexporters
                    };
                    table.entry(target).or_default().push(id);
                }
                _ => {}
            }
        }

        let nodes: Vec<&'a TopLevelNode> = indices.project().values().map(|node| node.as_ref()).collect();
        let resolver = ScopeResolver::new();
        let references = nodes
            .par_iter()
            .map(|&node| (node.id, resolver.analyze(&node.text, node.source_type)))
            .collect();

        Self {
            importers,
            reexporters,
            forwarders,
            references,
        }
    }

    pub(crate) fn importers_of(&self, file: &Path) -> &[NodeId] {
        self.importers.get(file).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn reexporters_of(&self, file: &Path) -> &[NodeId] {
        self.reexporters.get(file).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn forwarders_in(&self, file: &Path) -> &[NodeId] {
        self.forwarders.get(file).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether node `id` uses `name` in its top-level binding.
    pub(crate) fn references(&self, id: NodeId, name: &str) -> bool {
        self.references
            .get(&id)
            .is_some_and(|refs| refs.resolve(name).referenced)
    }

    pub(crate) fn approximate_fragments(&self) -> usize {
        self.references
            .values()
            .filter(|refs| refs.mode() == ResolutionMode::Approximate)
            .count()
    }

    /// Export names of `declaration`'s declared names within its own file.
    ///
    /// Sources are the declaration's own export pairs and every
    /// `export { local as alias }` or CommonJS assignment in the file that
    /// forwards one of its names.
    pub(crate) fn export_aliases(
        &self,
        indices: &'a Indices,
        declaration: &'a TopLevelNode,
    ) -> Vec<ExportAlias<'a>> {
        let declared = declaration.declared_names();
        let mut aliases = Vec::new();
        let mut push = |local: &'a str, exported: &'a str| {
            let alias = ExportAlias { local, exported };
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        };

        for pair in declaration.exported() {
            if declared.iter().any(|name| *name == pair.local) {
                push(&pair.local, &pair.exported);
            }
        }

        for &id in self.forwarders_in(declaration.file()) {
            if id == declaration.id {
                continue;
            }
            let Some(forwarder) = indices.node(id) else {
                continue;
            };
            let own = forwarder.declared_names();
            for pair in forwarder.exported() {
                if own.contains(&pair.local) {
                    continue;
                }
                if declared.iter().any(|name| *name == pair.local) {
                    push(&pair.local, &pair.exported);
                }
            }
        }

        aliases
    }
}
