//! Cross-file exploration of one exported name.

use std::collections::BTreeSet;
use std::collections::hash_map::Entry;
use std::path::Path;

use rustc_hash::FxHashMap;

use super::DependencyTracer;
use super::visited::VisitedSet;
use crate::node::{DEFAULT_EXPORT, NodeId, WILDCARD};

/// Consumers found while exploring one exported name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exploration {
    pub consumers: BTreeSet<NodeId>,
    pub reexports: BTreeSet<NodeId>,
    /// Some branch stopped at the depth limit.
    pub truncated: bool,
    /// Some branch stopped at an already visited `(file, name)` pair.
    pub hit_cycle: bool,
}

/// Shallowest depth at which each `(file, exported name)` was explored
/// during one declaration trace.
pub(crate) type Explored<'a> = FxHashMap<(&'a Path, &'a str), usize>;

impl<'a> DependencyTracer<'a> {
    /// Every node outside `source_file` that uses the export `name` of
    /// `source_file`, directly or through re-exports.
    pub fn find_external_usage(&self, name: &'a str, source_file: &'a Path) -> Exploration {
        let mut found = Exploration::default();
        self.explore(name, source_file, &VisitedSet::new(), &mut Explored::default(), &mut found);
        found
    }

    /// Add the consumers of `(source_file, name)` to `found`.
    ///
    /// `visited` is the current path and bounds its depth. `explored` spans
    /// the whole trace: consumers only accumulate, so a pair is walked again
    /// only when it is reached closer to the root after some branch was
    /// truncated.
    pub(crate) fn explore(
        &self,
        name: &'a str,
        source_file: &'a Path,
        visited: &VisitedSet<'a>,
        explored: &mut Explored<'a>,
        found: &mut Exploration,
    ) {
        if visited.contains(source_file, name) {
            found.hit_cycle = true;
            return;
        }
        let depth = visited.len();
        if depth >= self.max_depth {
            tracing::warn!(
                file = %source_file.display(),
                name,
                depth,
                "Re-export chain exceeds the depth limit"
            );
            found.truncated = true;
            return;
        }
        match explored.entry((source_file, name)) {
            Entry::Occupied(mut shallowest) => {
                if *shallowest.get() <= depth || !found.truncated {
                    return;
                }
                shallowest.insert(depth);
            }
            Entry::Vacant(slot) => {
                slot.insert(depth);
            }
        }

        let visited = visited.with(source_file, name);
        self.explore_importers(name, source_file, &visited, explored, found);
        self.explore_reexports(name, source_file, &visited, explored, found);
    }

    fn explore_importers(
        &self,
        name: &'a str,
        source_file: &'a Path,
        visited: &VisitedSet<'a>,
        explored: &mut Explored<'a>,
        found: &mut Exploration,
    ) {
        for &import_id in self.lookup.importers_of(source_file) {
            let Some(import) = self.indices.node(import_id) else {
                continue;
            };
            let consumer_file = import.file();
            if consumer_file == source_file {
                continue;
            }

            for specifier in import.kind.import_specifiers() {
                if !specifier.matches_export(name) {
                    continue;
                }
                let local = specifier.local.as_str();
                found.consumers.extend(self.users_in_file(consumer_file, local, import_id));

                // `export const x = require('m')` forwards its own binding.
                for pair in import.exported() {
                    if pair.local == local {
                        self.explore(&pair.exported, consumer_file, visited, explored, found);
                    }
                }

                for &forwarder_id in self.lookup.forwarders_in(consumer_file) {
                    let Some(forwarder) = self.indices.node(forwarder_id) else {
                        continue;
                    };
                    for pair in forwarder.exported() {
                        if pair.local == local && !forwarder.declared_names().contains(&pair.local) {
                            self.explore(&pair.exported, consumer_file, visited, explored, found);
                        }
                    }
                }
            }
        }
    }

    fn explore_reexports(
        &self,
        name: &'a str,
        source_file: &'a Path,
        visited: &VisitedSet<'a>,
        explored: &mut Explored<'a>,
        found: &mut Exploration,
    ) {
        for &reexport_id in self.lookup.reexporters_of(source_file) {
            let Some(reexport) = self.indices.node(reexport_id) else {
                continue;
            };
            let barrel = reexport.file();
            if barrel == source_file {
                continue;
            }

            for pair in reexport.exported() {
                let next: &'a str = if pair.local == WILDCARD {
                    if pair.exported != WILDCARD {
                        // export * as ns from '...'
                        &pair.exported
                    } else if name != DEFAULT_EXPORT {
                        name
                    } else {
                        continue;
                    }
                } else if pair.local == name {
                    &pair.exported
                } else {
                    continue;
                };
                found.reexports.insert(reexport_id);
                self.explore(next, barrel, visited, explored, found);
            }
        }
    }

    /// Nodes of `file` other than `skip` that use `local`.
    fn users_in_file(&self, file: &Path, local: &str, skip: NodeId) -> Vec<NodeId> {
        let Some(entry) = self.indices.file(file) else {
            return Vec::new();
        };
        entry
            .nodes
            .iter()
            .copied()
            .filter(|&id| id != skip && self.lookup.references(id, local))
            .collect()
    }
}
