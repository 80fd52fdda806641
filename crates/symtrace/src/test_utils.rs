//! In-memory project builder for tests.
//!
//! Available in this crate's own tests and to dependents through the
//! `test-utils` feature.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use symtrace_config::{AliasTable, EngineSettings};

use crate::analyzer::{AnalysisResult, Analyzer, Configured};
use crate::node::{NodeId, TopLevelNode};
use crate::result::TracedDeclaration;
use crate::runtime::MemoryRuntime;
use crate::source::SourceFile;

/// Default root of a [`TestProject`].
pub const TEST_ROOT: &str = "/project";

/// A virtual project: files on a [`MemoryRuntime`] plus the list handed to
/// the analyzer.
#[derive(Debug, Clone)]
pub struct TestProject {
    root: PathBuf,
    runtime: MemoryRuntime,
    files: Vec<SourceFile>,
    aliases: AliasTable,
    settings: EngineSettings,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    pub fn new() -> Self {
        Self::with_root(TEST_ROOT)
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            runtime: MemoryRuntime::new(),
            files: Vec::new(),
            aliases: AliasTable::new(),
            settings: EngineSettings::default(),
        }
    }

    /// Add a source file that is analyzed.
    pub fn file(mut self, relative: &str, contents: &str) -> Self {
        let source = SourceFile::new(&self.root, relative);
        self.runtime.insert(&source.absolute_path, contents);
        self.files.push(source);
        self
    }

    /// Add a file that exists on disk but is not in the input list.
    pub fn asset(mut self, relative: &str, contents: &str) -> Self {
        self.runtime.insert(self.root.join(relative), contents);
        self
    }

    pub fn aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn runtime(&self) -> &MemoryRuntime {
        &self.runtime
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// An analyzer over this project, ready to run.
    pub fn analyzer(&self) -> Analyzer<Configured> {
        Analyzer::new()
            .files(self.files.iter().cloned())
            .root(&self.root)
            .runtime(Arc::new(self.runtime.clone()))
            .aliases(self.aliases.clone())
            .settings(self.settings.clone())
    }

    pub fn analyze(&self) -> crate::Result<ProjectAnalysis> {
        let result = self.analyzer().analyze()?;
        Ok(ProjectAnalysis {
            root: self.root.clone(),
            result,
        })
    }
}

/// Analysis result addressed by relative path and declared name.
#[derive(Debug, Clone)]
pub struct ProjectAnalysis {
    root: PathBuf,
    pub result: AnalysisResult,
}

impl ProjectAnalysis {
    /// The declaration in `relative` binding `name`.
    pub fn declaration(&self, relative: &str, name: &str) -> Option<&TracedDeclaration> {
        let file = self.root.join(relative);
        self.result.declarations.values().find(|declaration| {
            declaration.node.file == file && declaration.node.declared_names().iter().any(|n| n == name)
        })
    }

    /// The node of `relative` whose source text contains `needle`.
    pub fn node_containing(&self, relative: &str, needle: &str) -> Option<&TopLevelNode> {
        let file = self.root.join(relative);
        self.result
            .indices
            .project()
            .values()
            .find(|node| node.file == file && node.text.contains(needle))
            .map(|node| node.as_ref())
    }

    pub fn id_containing(&self, relative: &str, needle: &str) -> Option<NodeId> {
        self.node_containing(relative, needle).map(|node| node.id)
    }

    /// Relative paths of the files owning `ids`, sorted and deduplicated.
    pub fn files_of(&self, ids: impl IntoIterator<Item = NodeId>) -> Vec<String> {
        let mut files: Vec<String> = ids
            .into_iter()
            .filter_map(|id| self.result.trace.owner_file(id))
            .filter_map(|path| path.strip_prefix(&self.root).ok())
            .map(|path| path.to_string_lossy().replace('\\', "/"))
            .collect();
        files.sort();
        files.dedup();
        files
    }
}
