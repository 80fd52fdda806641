//! Alias-table discovery from `tsconfig.json` / `jsconfig.json`.
//!
//! The engine resolves module specifiers through a table of wildcard rewrite
//! rules (`"@components/*" → "<abs>/src/components/*"`) plus an optional base
//! directory for bare specifiers. This module builds that table from the
//! project's TypeScript configuration, following `extends` chains.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::jsonc;

/// Config files probed by [`AliasTable::discover`], in order.
pub const TSCONFIG_CANDIDATES: &[&str] = &["tsconfig.json", "jsconfig.json"];

/// One specifier rewrite rule.
///
/// `pattern` may contain a single `*` wildcard; every target is an absolute
/// path template in which `*` is replaced by the wildcard capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRule {
    pub pattern: String,
    pub targets: Vec<String>,
}

impl AliasRule {
    pub fn new(pattern: impl Into<String>, targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            pattern: pattern.into(),
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resolved alias configuration consumed by the module resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTable {
    pub rules: Vec<AliasRule>,
    /// Directory bare specifiers are probed under (`compilerOptions.baseUrl`).
    pub base_dir: Option<PathBuf>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. Builder-style, mostly for tests and embedders.
    pub fn with_rule(mut self, rule: AliasRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.base_dir.is_none()
    }

    /// Look for `tsconfig.json`, then `jsconfig.json`, in `root`.
    ///
    /// A project without either file gets an empty table; that is not an
    /// error.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        for candidate in TSCONFIG_CANDIDATES {
            let path = root.join(candidate);
            if path.is_file() {
                tracing::debug!("Loading alias table from {}", path.display());
                return Self::from_tsconfig(&path);
            }
        }
        Ok(Self::default())
    }

    /// Build the table from a specific config file, following `extends`.
    pub fn from_tsconfig(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let mut chain = Vec::new();
        let layered = load_layer(path, &mut chain)?;

        let mut table = AliasTable {
            rules: Vec::new(),
            base_dir: layered.base_dir.clone(),
        };

        if let Some((paths, declaring_dir)) = layered.paths {
            let prefix_dir = layered.base_dir.unwrap_or(declaring_dir);
            for (pattern, targets) in paths {
                let targets = targets
                    .iter()
                    .map(|target| prefix_dir.join(target).clean().to_string_lossy().into_owned())
                    .collect::<Vec<_>>();
                table.rules.push(AliasRule { pattern, targets });
            }
        }

        Ok(table)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    #[serde(default)]
    extends: Option<Extends>,
    #[serde(default)]
    compiler_options: Option<RawCompilerOptions>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Extends {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    paths: Option<IndexMap<String, Vec<String>>>,
}

/// Effective settings after merging an `extends` chain.
#[derive(Debug, Default)]
struct Layer {
    base_dir: Option<PathBuf>,
    /// Path mappings plus the directory of the file that declared them.
    paths: Option<(IndexMap<String, Vec<String>>, PathBuf)>,
}

fn load_layer(path: &Path, chain: &mut Vec<PathBuf>) -> Result<Layer> {
    let canonical = path.to_path_buf().clean();
    if chain.contains(&canonical) {
        return Err(ConfigError::CircularExtends(canonical));
    }
    chain.push(canonical.clone());

    let content = fs::read_to_string(&canonical)?;
    let value: Value =
        serde_json::from_str(&jsonc::to_json(&content)).map_err(|e| ConfigError::InvalidJson {
            path: canonical.clone(),
            message: e.to_string(),
        })?;
    let raw: RawTsConfig =
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "compilerOptions".to_string(),
            hint: format!("{}: {}", canonical.display(), e),
        })?;

    let dir = canonical
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut layer = Layer::default();
    let parents = match raw.extends {
        Some(Extends::One(one)) => vec![one],
        Some(Extends::Many(many)) => many,
        None => Vec::new(),
    };
    for parent in parents {
        match locate_extended(&dir, &parent) {
            Some(parent_path) => {
                let parent_layer = load_layer(&parent_path, chain)?;
                if parent_layer.base_dir.is_some() {
                    layer.base_dir = parent_layer.base_dir;
                }
                if parent_layer.paths.is_some() {
                    layer.paths = parent_layer.paths;
                }
            }
            None => {
                tracing::warn!(
                    "{} extends '{}', which could not be found; ignoring",
                    canonical.display(),
                    parent
                );
            }
        }
    }

    if let Some(options) = raw.compiler_options {
        if let Some(base_url) = options.base_url {
            layer.base_dir = Some(dir.join(base_url).clean());
        }
        if let Some(paths) = options.paths {
            layer.paths = Some((paths, dir.clone()));
        }
    }

    chain.pop();
    Ok(layer)
}

/// Locate the file named by an `extends` entry relative to `dir`.
fn locate_extended(dir: &Path, specifier: &str) -> Option<PathBuf> {
    let base = if specifier.starts_with('.') || Path::new(specifier).is_absolute() {
        dir.join(specifier)
    } else {
        dir.join("node_modules").join(specifier)
    };

    let mut candidates = vec![base.clone()];
    if base.extension().is_none_or(|ext| ext != "json") {
        let mut with_ext = base.clone().into_os_string();
        with_ext.push(".json");
        candidates.push(PathBuf::from(with_ext));
        candidates.push(base.join("tsconfig.json"));
    }

    candidates.into_iter().map(|c| c.clean()).find(|c| c.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_yields_empty_table() {
        let dir = TempDir::new().unwrap();
        let table = AliasTable::discover(dir.path()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn targets_are_made_absolute_against_base_url() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{
                // comment
                "compilerOptions": {
                    "baseUrl": "./src",
                    "paths": { "@ui/*": ["components/*"], },
                },
            }"#,
        )
        .unwrap();

        let table = AliasTable::discover(dir.path()).unwrap();
        let root = dir.path().to_path_buf().clean();
        assert_eq!(table.base_dir, Some(root.join("src")));
        assert_eq!(table.rules.len(), 1);
        assert_eq!(table.rules[0].pattern, "@ui/*");
        assert_eq!(
            table.rules[0].targets,
            vec![root.join("src/components/*").to_string_lossy().into_owned()]
        );
    }

    #[test]
    fn circular_extends_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{ "extends": "./b.json" }"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{ "extends": "./a.json" }"#).unwrap();

        let err = AliasTable::from_tsconfig(dir.path().join("a.json")).unwrap_err();
        assert!(matches!(err, ConfigError::CircularExtends(_)));
    }
}
