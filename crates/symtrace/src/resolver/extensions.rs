//! Extension and index-file probing for local module paths.

use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".");
    raw.push(ext);
    PathBuf::from(raw)
}

/// TypeScript sources that compile to a given JavaScript extension.
fn typescript_counterparts(ext: &str) -> &'static [&'static str] {
    match ext {
        "js" => &["ts", "tsx"],
        "jsx" => &["tsx"],
        "mjs" => &["mts"],
        "cjs" => &["cts"],
        _ => &[],
    }
}

/// Find the file a local specifier refers to.
///
/// Tries, in order: the path as-is, each extension appended, the TypeScript
/// counterpart of a `.js`-style path, then `<path>/index.<ext>`.
pub(crate) fn find_source_file(candidate: &Path, extensions: &[String], runtime: &dyn Runtime) -> Option<PathBuf> {
    if runtime.is_file(candidate) {
        return Some(candidate.to_path_buf());
    }

    for ext in extensions {
        let with_ext = with_appended_extension(candidate, ext);
        if runtime.is_file(&with_ext) {
            return Some(with_ext);
        }
    }

    if let Some(ext) = candidate.extension().and_then(|ext| ext.to_str()) {
        for ts_ext in typescript_counterparts(ext) {
            let rewritten = candidate.with_extension(ts_ext);
            if runtime.is_file(&rewritten) {
                return Some(rewritten);
            }
        }
    }

    if runtime.is_dir(candidate) {
        for ext in extensions {
            let index = candidate.join(format!("index.{ext}"));
            if runtime.is_file(&index) {
                return Some(index);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MemoryRuntime;

    fn exts() -> Vec<String> {
        ["ts", "tsx", "js", "d.ts"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_path_wins() {
        let rt = MemoryRuntime::new()
            .with_file("/p/a.ts", "")
            .with_file("/p/a.ts.ts", "");
        assert_eq!(find_source_file(Path::new("/p/a.ts"), &exts(), &rt), Some(PathBuf::from("/p/a.ts")));
    }

    #[test]
    fn extensions_are_appended_not_replaced() {
        let rt = MemoryRuntime::new().with_file("/p/button.styles.ts", "");
        assert_eq!(
            find_source_file(Path::new("/p/button.styles"), &exts(), &rt),
            Some(PathBuf::from("/p/button.styles.ts"))
        );
        let rt = MemoryRuntime::new().with_file("/p/types.d.ts", "");
        assert_eq!(
            find_source_file(Path::new("/p/types"), &exts(), &rt),
            Some(PathBuf::from("/p/types.d.ts"))
        );
    }

    #[test]
    fn js_specifier_maps_to_ts_source() {
        let rt = MemoryRuntime::new().with_file("/p/util.ts", "");
        assert_eq!(
            find_source_file(Path::new("/p/util.js"), &exts(), &rt),
            Some(PathBuf::from("/p/util.ts"))
        );
    }

    #[test]
    fn directories_resolve_to_index_files() {
        let rt = MemoryRuntime::new().with_file("/p/lib/index.tsx", "");
        assert_eq!(
            find_source_file(Path::new("/p/lib"), &exts(), &rt),
            Some(PathBuf::from("/p/lib/index.tsx"))
        );
        assert_eq!(find_source_file(Path::new("/p/nothing"), &exts(), &rt), None);
    }
}
