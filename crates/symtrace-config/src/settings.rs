//! Engine settings shared by indexing and tracing.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Settings file probed in the project root.
pub const SETTINGS_FILE_NAME: &str = "symtrace.toml";

/// Maximum file size in bytes (10 MB).
///
/// Larger files are skipped during indexing to bound memory use.
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum re-export hops followed from a single declaration.
pub const DEFAULT_MAX_TRACE_DEPTH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Extensions probed, in order, when a specifier names no existing file.
    pub extensions: Vec<String>,

    /// Root-relative specifier prefixes (`@/button` → `<root dir>/button`).
    pub root_prefixes: Vec<String>,

    /// Directory the root prefixes map to. Defaults to `<root>/src` when it
    /// exists, otherwise `<root>`.
    pub root_prefix_dir: Option<PathBuf>,

    pub max_file_size: usize,

    pub max_trace_depth: usize,

    /// Worker threads for indexing and tracing; `None` uses rayon's global
    /// pool.
    pub threads: Option<usize>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            extensions: ["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts", "d.ts"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            root_prefixes: vec!["@/".to_string(), "~/".to_string()],
            root_prefix_dir: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_trace_depth: DEFAULT_MAX_TRACE_DEPTH,
            threads: None,
        }
    }
}

impl EngineSettings {
    /// Load settings for a project.
    ///
    /// Priority: environment variables (`SYMTRACE_*`) > `symtrace.toml` in
    /// `root` > defaults.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        Self::from_figment(Self::figment(root))
    }

    /// The provider stack used by [`EngineSettings::load`], exposed so
    /// callers can merge further overrides.
    pub fn figment(root: impl AsRef<Path>) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(root.as_ref().join(SETTINGS_FILE_NAME)))
            .merge(Env::prefixed("SYMTRACE_"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Self = figment
            .extract()
            .map_err(|e| ConfigError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.max_trace_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_trace_depth".to_string(),
                hint: "must be at least 1".to_string(),
            });
        }
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "threads".to_string(),
                hint: "use a positive thread count or omit the field".to_string(),
            });
        }
        Ok(())
    }
}
