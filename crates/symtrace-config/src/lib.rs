//! Configuration for the symtrace engine.
//!
//! Two independent pieces live here:
//!
//! - [`AliasTable`]: module-specifier rewrite rules discovered from a
//!   project's `tsconfig.json` / `jsconfig.json` (`compilerOptions.paths`
//!   and `baseUrl`). The engine only consumes the resolved table.
//! - [`EngineSettings`]: tuning knobs for indexing and tracing, merged from
//!   defaults, an optional `symtrace.toml`, and `SYMTRACE_*` environment
//!   variables.

pub mod error;
mod jsonc;
pub mod settings;
pub mod tsconfig;

pub use error::{ConfigError, Result};
pub use settings::{
    DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_TRACE_DEPTH, EngineSettings, SETTINGS_FILE_NAME,
};
pub use tsconfig::{AliasRule, AliasTable, TSCONFIG_CANDIDATES};
