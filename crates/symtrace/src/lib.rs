#![cfg_attr(docsrs, feature(doc_cfg))]

//! # symtrace
//!
//! Symbol dependency graph engine for JavaScript and TypeScript projects.
//!
//! For every top-level declaration of a set of modules, symtrace computes
//! which other code uses the declared name: nodes of the same file
//! (internal consumers) and nodes of other files reached through imports,
//! aliases, namespace imports, `export ... from` chains and CommonJS
//! `require` (external consumers).
//!
//! ## Pipeline
//!
//! - [`ModuleIndexer`] parses every file once through a [`SyntaxFrontEnd`]
//!   and builds [`Indices`] of top-level nodes, resolving module specifiers
//!   with a [`ModuleResolver`].
//! - [`ScopeResolver`] decides whether a fragment references a name in its
//!   non-shadowed binding, falling back to lexical matching when a fragment
//!   does not parse.
//! - [`DependencyTracer`] combines both to produce a [`TraceResult`].
//!
//! [`Analyzer`] runs the whole pipeline:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use symtrace::{Analyzer, MemoryRuntime, SourceFile};
//!
//! # fn main() -> symtrace::Result<()> {
//! let runtime = MemoryRuntime::new()
//!     .with_file("/app/math.ts", "export const add = (a: number, b: number) => a + b;")
//!     .with_file("/app/main.ts", "import { add as plus } from './math';\nconsole.log(plus(1, 2));");
//!
//! let analysis = Analyzer::new()
//!     .files(["math.ts", "main.ts"].map(|p| SourceFile::new("/app", p)))
//!     .runtime(Arc::new(runtime))
//!     .analyze()?;
//!
//! println!("{}", analysis.summary);
//! # Ok(()) }
//! ```
//!
//! ## Features
//!
//! - `logging`: [`init_logging`] / [`init_logging_from_env`] subscriber helpers
//! - `test-utils`: the in-memory project builder used by the test-suite

pub mod analyzer;
pub mod error;
pub mod frontend;
pub mod index;
pub mod node;
pub mod resolver;
pub mod result;
pub mod runtime;
pub mod scope;
pub mod source;
pub mod trace;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

pub use analyzer::{AnalysisResult, Analyzer, Configured, Unconfigured};
pub use error::{Error, Result};
pub use frontend::{FrontEndError, OxcFrontEnd, StatementDescriptor, StatementSyntax, SyntaxFrontEnd};
pub use index::{FileEntry, IndexWarning, IndexWarningKind, Indices, ModuleIndexer, NodeMap};
pub use node::{
    DEFAULT_EXPORT, ExportedName, ImportClause, ImportKind, ImportSpecifier, NodeId, NodeKind,
    TextSpan, TopLevelNode, WILDCARD,
};
pub use resolver::{ModuleResolver, ResolvedModule};
pub use result::{DeclarationMap, DependencyResult, TraceResult, TraceSummary, TracedDeclaration};
pub use runtime::{FileMetadata, MemoryRuntime, NativeRuntime, Runtime, RuntimeError, RuntimeResult};
pub use scope::{FragmentReferences, Resolution, ResolutionMode, ScopeResolver};
pub use source::{SourceFile, SourceType};
pub use trace::{DependencyTracer, Exploration, VisitedSet, trace_all};

pub use symtrace_config::{AliasRule, AliasTable, ConfigError, EngineSettings};

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};
