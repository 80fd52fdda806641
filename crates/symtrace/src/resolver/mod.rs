//! Module specifier resolution.
//!
//! Resolution order:
//! 1. Alias table rules (tsconfig `paths`), most specific first
//! 2. Root-relative prefixes (`@/`, `~/`)
//! 3. Relative or absolute paths against the importing file's directory
//! 4. Bare specifiers under the configured base directory (`baseUrl`)
//! 5. Otherwise an external package

mod aliases;
mod extensions;

use std::fmt;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use symtrace_config::{AliasTable, EngineSettings};

use crate::runtime::Runtime;

use aliases::AliasMatcher;
use extensions::find_source_file;

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "camelCase")]
pub enum ResolvedModule {
    /// An existing project file.
    Local(PathBuf),
    /// A local path was computed but no file exists there.
    Missing(PathBuf),
    /// A package specifier; never traced.
    External(String),
}

impl ResolvedModule {
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Local(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for ResolvedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Missing(path) => write!(f, "missing: {}", path.display()),
            Self::External(name) => write!(f, "external: {name}"),
        }
    }
}

fn is_path_like(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || Path::new(specifier).is_absolute()
}

/// Module resolver configured for one project.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    aliases: AliasMatcher,
    base_dir: Option<PathBuf>,
    root_prefixes: Vec<String>,
    root_prefix_dir: PathBuf,
    extensions: Vec<String>,
}

impl ModuleResolver {
    /// Create a resolver for the project at `root`.
    ///
    /// Without an explicit `root_prefix_dir`, root prefixes map to
    /// `<root>/src` when that directory exists and to `<root>` otherwise.
    pub fn new(
        root: &Path,
        settings: &EngineSettings,
        aliases: &AliasTable,
        runtime: &dyn Runtime,
    ) -> Self {
        let root = root.to_path_buf().clean();
        let root_prefix_dir = match &settings.root_prefix_dir {
            Some(dir) if dir.is_absolute() => dir.clean(),
            Some(dir) => root.join(dir).clean(),
            None => {
                let src = root.join("src");
                if runtime.is_dir(&src) { src } else { root.clone() }
            }
        };

        Self {
            aliases: AliasMatcher::new(aliases),
            base_dir: aliases.base_dir.clone(),
            root_prefixes: settings.root_prefixes.clone(),
            root_prefix_dir,
            extensions: settings.extensions.clone(),
        }
    }

    pub fn root_prefix_dir(&self) -> &Path {
        &self.root_prefix_dir
    }

    /// Resolve `specifier` as written in a file located in `from_dir`.
    pub fn resolve(&self, specifier: &str, from_dir: &Path, runtime: &dyn Runtime) -> ResolvedModule {
        let mut unmatched_alias = None;
        for candidate in self.aliases.candidates(specifier) {
            let candidate = candidate.clean();
            if let Some(found) = find_source_file(&candidate, &self.extensions, runtime) {
                return ResolvedModule::Local(found);
            }
            unmatched_alias.get_or_insert(candidate);
        }

        if let Some(rest) = self
            .root_prefixes
            .iter()
            .find_map(|prefix| specifier.strip_prefix(prefix.as_str()))
        {
            return self.resolve_local(self.root_prefix_dir.join(rest).clean(), runtime);
        }

        if is_path_like(specifier) {
            return self.resolve_local(from_dir.join(specifier).clean(), runtime);
        }

        if let Some(base) = &self.base_dir {
            if let Some(found) = find_source_file(&base.join(specifier).clean(), &self.extensions, runtime) {
                return ResolvedModule::Local(found);
            }
        }

        match unmatched_alias {
            Some(candidate) => ResolvedModule::Missing(candidate),
            None => ResolvedModule::External(specifier.to_string()),
        }
    }

    fn resolve_local(&self, candidate: PathBuf, runtime: &dyn Runtime) -> ResolvedModule {
        match find_source_file(&candidate, &self.extensions, runtime) {
            Some(found) => ResolvedModule::Local(found),
            None => ResolvedModule::Missing(candidate),
        }
    }
}
