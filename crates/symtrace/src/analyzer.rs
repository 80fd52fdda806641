//! One-call analysis: index a list of files and trace every declaration.
//!
//! ```rust,no_run
//! use symtrace::{Analyzer, SourceFile};
//!
//! # fn main() -> symtrace::Result<()> {
//! let files = ["src/index.ts", "src/utils.ts"].map(|p| SourceFile::new("/project", p));
//! let analysis = Analyzer::new()
//!     .files(files)
//!     .discover_config(true)
//!     .analyze()?;
//!
//! for (id, declaration) in &analysis.declarations {
//!     println!("{id}: {} external users", declaration.dependencies.external.len());
//! }
//! # Ok(()) }
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use symtrace_config::{AliasTable, EngineSettings};

use crate::error::{Error, Result};
use crate::frontend::{OxcFrontEnd, SyntaxFrontEnd};
use crate::index::{IndexWarning, Indices, ModuleIndexer};
use crate::resolver::ModuleResolver;
use crate::result::{DeclarationMap, TraceResult, TraceSummary, TracedDeclaration};
use crate::runtime::{NativeRuntime, Runtime, RuntimeError};
use crate::source::SourceFile;
use crate::trace::DependencyTracer;

/// Typestate marker: no input files yet.
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured;

/// Typestate marker: input files set, `analyze` available.
#[derive(Debug, Clone, Copy)]
pub struct Configured;

/// Builder wiring runtime, front end, indexer and tracer together.
///
/// `analyze` only exists once files have been supplied.
pub struct Analyzer<State = Unconfigured> {
    files: Vec<SourceFile>,
    root: Option<PathBuf>,
    runtime: Option<Arc<dyn Runtime>>,
    front_end: Option<Arc<dyn SyntaxFrontEnd>>,
    aliases: Option<AliasTable>,
    settings: Option<EngineSettings>,
    max_trace_depth: Option<usize>,
    threads: Option<usize>,
    discover_config: bool,
    _state: PhantomData<State>,
}

impl Analyzer<Unconfigured> {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            root: None,
            runtime: None,
            front_end: None,
            aliases: None,
            settings: None,
            max_trace_depth: None,
            threads: None,
            discover_config: false,
            _state: PhantomData,
        }
    }
}

impl Default for Analyzer<Unconfigured> {
    fn default() -> Self {
        Self::new()
    }
}

impl<State> Analyzer<State> {
    /// Add input files, as produced by a module loader.
    pub fn files(mut self, files: impl IntoIterator<Item = SourceFile>) -> Analyzer<Configured> {
        self.files.extend(files);
        Analyzer {
            files: self.files,
            root: self.root,
            runtime: self.runtime,
            front_end: self.front_end,
            aliases: self.aliases,
            settings: self.settings,
            max_trace_depth: self.max_trace_depth,
            threads: self.threads,
            discover_config: self.discover_config,
            _state: PhantomData,
        }
    }

    /// Project root used for root prefixes and config discovery.
    ///
    /// Defaults to the root implied by the first input file.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// File-system access; defaults to [`NativeRuntime`].
    pub fn runtime(mut self, runtime: Arc<dyn Runtime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Parser; defaults to [`OxcFrontEnd`].
    pub fn front_end(mut self, front_end: Arc<dyn SyntaxFrontEnd>) -> Self {
        self.front_end = Some(front_end);
        self
    }

    /// Explicit alias table. Takes precedence over discovery.
    pub fn aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = Some(aliases);
        self
    }

    /// Explicit settings. Take precedence over `symtrace.toml`.
    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn max_trace_depth(mut self, depth: usize) -> Self {
        self.max_trace_depth = Some(depth);
        self
    }

    /// Run on a dedicated pool of `threads` workers.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Load `symtrace.toml`, `SYMTRACE_*` variables and `tsconfig.json` /
    /// `jsconfig.json` from the root for whatever was not set explicitly.
    pub fn discover_config(mut self, discover: bool) -> Self {
        self.discover_config = discover;
        self
    }
}

impl Analyzer<Configured> {
    pub fn analyze(self) -> Result<AnalysisResult> {
        let root = self
            .root
            .clone()
            .or_else(|| self.files.first().map(SourceFile::root))
            .unwrap_or_default();
        let runtime = self.runtime.unwrap_or_else(|| Arc::new(NativeRuntime::new()));
        if self.root.is_some() && !runtime.is_dir(&root) {
            return Err(Error::Runtime(RuntimeError::FileNotFound(root)));
        }

        let mut settings = match (self.settings, self.discover_config) {
            (Some(settings), _) => settings,
            (None, true) => EngineSettings::load(&root)?,
            (None, false) => EngineSettings::default(),
        };
        if let Some(depth) = self.max_trace_depth {
            settings.max_trace_depth = depth;
        }
        if let Some(threads) = self.threads {
            settings.threads = Some(threads);
        }
        let aliases = match (self.aliases, self.discover_config) {
            (Some(aliases), _) => aliases,
            (None, true) => AliasTable::discover(&root)?,
            (None, false) => AliasTable::new(),
        };

        let front_end = self.front_end.unwrap_or_else(|| Arc::new(OxcFrontEnd::new()));
        let resolver = ModuleResolver::new(&root, &settings, &aliases, runtime.as_ref());
        let indexer = ModuleIndexer::new(runtime, front_end, resolver, settings.max_file_size);

        tracing::debug!(
            root = %root.display(),
            files = self.files.len(),
            alias_rules = aliases.rules.len(),
            "Starting analysis"
        );

        let files = self.files;
        let max_depth = settings.max_trace_depth;
        let run = || {
            let indices = indexer.index_all(&files);
            let trace = DependencyTracer::new(&indices)
                .with_max_depth(max_depth)
                .trace_all();
            (indices, trace)
        };

        let (indices, trace) = match settings.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("symtrace-{i}"))
                .build()
                .map_err(|e| Error::ThreadPool(e.to_string()))?
                .install(run),
            None => run(),
        };

        let declarations = trace.declaration_map(&indices);
        let summary = TraceSummary::new(&trace, &indices);
        tracing::info!(
            declarations = summary.declarations,
            orphaned = summary.orphaned,
            skipped = summary.skipped_files,
            "Analysis complete"
        );

        Ok(AnalysisResult {
            indices,
            trace,
            declarations,
            summary,
        })
    }
}

/// Everything one analysis run produced.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub indices: Indices,
    pub trace: TraceResult,
    /// Declarations with their consumers, in declaration order.
    pub declarations: DeclarationMap,
    pub summary: TraceSummary,
}

impl AnalysisResult {
    pub fn warnings(&self) -> &[IndexWarning] {
        self.indices.warnings()
    }

    /// Declarations nobody uses.
    pub fn orphaned(&self) -> impl Iterator<Item = &TracedDeclaration> {
        self.declarations
            .values()
            .filter(|declaration| declaration.dependencies.is_orphaned())
    }

    /// Serialize the declaration map and summary.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Report<'r> {
            summary: &'r TraceSummary,
            declarations: &'r DeclarationMap,
        }

        serde_json::to_string_pretty(&Report {
            summary: &self.summary,
            declarations: &self.declarations,
        })
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;
        for warning in self.warnings() {
            writeln!(f, "warning: {warning}")?;
        }
        Ok(())
    }
}
