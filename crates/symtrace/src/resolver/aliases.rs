//! Path alias handling for module resolution.
//!
//! tsconfig-style patterns (`"@components/*"`) are compiled to anchored
//! regular expressions. The most specific pattern, the one with the longest
//! literal prefix, is tried first.

use std::path::PathBuf;

use regex::Regex;
use symtrace_config::{AliasRule, AliasTable};

#[derive(Debug, Clone)]
pub(crate) struct CompiledAlias {
    pattern: Regex,
    literal_prefix: usize,
    targets: Vec<String>,
}

impl CompiledAlias {
    fn compile(rule: &AliasRule) -> Result<Self, regex::Error> {
        let (prefix, suffix) = match rule.pattern.split_once('*') {
            Some((prefix, suffix)) => (prefix, Some(suffix)),
            None => (rule.pattern.as_str(), None),
        };
        let source = match suffix {
            Some(suffix) => format!("^{}(.*){}$", regex::escape(prefix), regex::escape(suffix)),
            None => format!("^{}$", regex::escape(prefix)),
        };
        Ok(Self {
            pattern: Regex::new(&source)?,
            literal_prefix: prefix.len(),
            targets: rule.targets.clone(),
        })
    }

    /// Candidate paths for `specifier`, in target order.
    fn candidates(&self, specifier: &str) -> Option<Vec<PathBuf>> {
        let captures = self.pattern.captures(specifier)?;
        let wildcard = captures.get(1).map_or("", |m| m.as_str());
        Some(
            self.targets
                .iter()
                .map(|target| PathBuf::from(target.replacen('*', wildcard, 1)))
                .collect(),
        )
    }
}

/// Alias rules ordered by specificity.
#[derive(Debug, Clone, Default)]
pub(crate) struct AliasMatcher {
    rules: Vec<CompiledAlias>,
}

impl AliasMatcher {
    pub(crate) fn new(table: &AliasTable) -> Self {
        let mut rules: Vec<CompiledAlias> = table
            .rules
            .iter()
            .filter_map(|rule| match CompiledAlias::compile(rule) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    tracing::warn!("Ignoring path alias '{}': {}", rule.pattern, e);
                    None
                }
            })
            .collect();
        // Stable: equally specific rules keep their configured order.
        rules.sort_by(|a, b| b.literal_prefix.cmp(&a.literal_prefix));
        Self { rules }
    }

    /// Candidates from every matching rule, most specific first.
    pub(crate) fn candidates(&self, specifier: &str) -> Vec<PathBuf> {
        self.rules
            .iter()
            .filter_map(|rule| rule.candidates(specifier))
            .flatten()
            .collect()
    }
}
