//! Scenario tests running the full pipeline over in-memory projects.

mod consumer_tests;
mod pipeline_tests;
mod reexport_tests;

use crate::node::NodeId;
use crate::test_utils::{ProjectAnalysis, TestProject};

fn analyze(project: TestProject) -> ProjectAnalysis {
    project.analyze().expect("analysis should succeed")
}

/// Id of the node in `file` whose text contains `needle`.
fn id(analysis: &ProjectAnalysis, file: &str, needle: &str) -> NodeId {
    analysis
        .id_containing(file, needle)
        .unwrap_or_else(|| panic!("no node containing {needle:?} in {file}"))
}

fn ids<const N: usize>(analysis: &ProjectAnalysis, nodes: [(&str, &str); N]) -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = nodes
        .iter()
        .map(|(file, needle)| id(analysis, file, needle))
        .collect();
    ids.sort();
    ids
}

fn deps<'r>(analysis: &'r ProjectAnalysis, file: &str, name: &str) -> &'r crate::DependencyResult {
    &analysis
        .declaration(file, name)
        .unwrap_or_else(|| panic!("no declaration of {name} in {file}"))
        .dependencies
}

fn sorted(set: &std::collections::BTreeSet<NodeId>) -> Vec<NodeId> {
    set.iter().copied().collect()
}
