//! Error types for symtrace operations.
//!
//! Problems with individual files or fragments never surface here; they are
//! reported as [`IndexWarning`](crate::IndexWarning)s or approximate
//! resolutions.

use symtrace_config::ConfigError;

use crate::runtime::RuntimeError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Settings or alias configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The runtime failed outside of per-file reads.
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// A dedicated worker pool could not be started.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Result type alias for symtrace operations.
pub type Result<T> = std::result::Result<T, Error>;
