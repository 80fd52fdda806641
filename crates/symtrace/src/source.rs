//! Source file records handed to the engine by the module loader.

use std::fmt;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

/// Source type of a module file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
    Json,
    Unknown,
}

impl SourceType {
    /// Derive the source type from a file extension string.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "js" | "mjs" | "cjs" => Self::JavaScript,
            "ts" | "mts" | "cts" => Self::TypeScript,
            "jsx" => Self::Jsx,
            "tsx" => Self::Tsx,
            "json" => Self::Json,
            _ => Self::Unknown,
        }
    }

    /// Attempt to infer the source type from a file path.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(Self::Unknown, Self::from_extension)
    }

    /// Returns true if the file is JavaScript/TypeScript based.
    pub fn is_javascript_like(&self) -> bool {
        matches!(
            self,
            Self::JavaScript | Self::TypeScript | Self::Jsx | Self::Tsx
        )
    }

    pub fn is_typescript(&self) -> bool {
        matches!(self, Self::TypeScript | Self::Tsx)
    }
}

/// One module file: `(absolute path, relative path, extension)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFile {
    pub absolute_path: PathBuf,
    pub relative_path: PathBuf,
    /// Extension without the leading dot (`"ts"`, `"jsx"`); empty when absent.
    pub extension: String,
}

impl SourceFile {
    /// Build a record for `path`, which may be absolute or relative to `root`.
    pub fn new(root: impl AsRef<Path>, path: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf().clean();
        let path = path.as_ref();
        let absolute_path = if path.is_absolute() {
            path.to_path_buf().clean()
        } else {
            root.join(path).clean()
        };
        let relative_path = absolute_path
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| absolute_path.clone());
        let extension = absolute_path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_string();

        Self {
            absolute_path,
            relative_path,
            extension,
        }
    }

    pub fn source_type(&self) -> SourceType {
        SourceType::from_extension(&self.extension)
    }

    /// Directory relative specifiers in this file resolve against.
    pub fn dir(&self) -> &Path {
        self.absolute_path.parent().unwrap_or(Path::new("/"))
    }

    /// The project root implied by the absolute and relative paths.
    pub fn root(&self) -> PathBuf {
        let depth = self.relative_path.components().count();
        self.absolute_path
            .ancestors()
            .nth(depth)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.dir().to_path_buf())
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_joined_and_cleaned() {
        let file = SourceFile::new("/proj", "src/./lib/../util.ts");
        assert_eq!(file.absolute_path, PathBuf::from("/proj/src/util.ts"));
        assert_eq!(file.relative_path, PathBuf::from("src/util.ts"));
        assert_eq!(file.extension, "ts");
        assert_eq!(file.source_type(), SourceType::TypeScript);
        assert_eq!(file.root(), PathBuf::from("/proj"));
    }

    #[test]
    fn absolute_paths_are_made_relative_to_root() {
        let file = SourceFile::new("/proj/", "/proj/app/Button.tsx");
        assert_eq!(file.relative_path, PathBuf::from("app/Button.tsx"));
        assert_eq!(file.source_type(), SourceType::Tsx);
        assert_eq!(file.dir(), Path::new("/proj/app"));
    }

    #[test]
    fn source_type_from_extension() {
        assert_eq!(SourceType::from_extension("cjs"), SourceType::JavaScript);
        assert_eq!(SourceType::from_extension("mts"), SourceType::TypeScript);
        assert_eq!(SourceType::from_extension("json"), SourceType::Json);
        assert!(!SourceType::from_extension("css").is_javascript_like());
        assert!(SourceType::Jsx.is_javascript_like());
    }
}
