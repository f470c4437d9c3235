//! Source-tree traversal with extension and directory filtering.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::error::{AtlasError, Result};
use crate::models::SourceTag;

/// Collect candidate files under `root`, recursing into subdirectories not
/// named in the exclusion set and keeping files whose extension is on the
/// allow-list.
///
/// A missing or unreadable root is fatal for this source only and reported
/// distinctly. Everything below the root is best-effort: unreadable entries
/// are skipped and logged, never propagated. Symlinks are followed, with
/// walkdir's ancestor-chain check catching link cycles (a cycle is reported
/// as an error entry, which is skipped like any other).
///
/// Results are sorted so downstream passes see a stable file order.
pub fn collect_files(root: &Path, source: SourceTag, scan: &ScanConfig) -> Result<Vec<PathBuf>> {
    // Probe the root eagerly: per-file errors are tolerated below, but a bad
    // root means this source has nothing to extract and the caller must know.
    let _ = fs::read_dir(root).map_err(|io| AtlasError::SourceRoot {
        source,
        path: root.to_path_buf(),
        io,
    })?;

    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, &scan.exclude_dirs));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {}: {err}", root.display());
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if has_allowed_extension(entry.path(), &scan.extensions) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn is_excluded_dir(entry: &DirEntry, exclude_dirs: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || exclude_dirs.iter().any(|d| d.as_str() == name)
}

fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|allowed| allowed.as_str() == ext)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn scan() -> ScanConfig {
        ScanConfig::default()
    }

    #[test]
    fn collects_only_allowed_extensions() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("model.rb"), "class A < ApplicationRecord\nend").unwrap();
        fs::write(temp.path().join("notes.txt"), "not source").unwrap();
        fs::write(temp.path().join("image.png"), [0u8; 4]).unwrap();

        let files = collect_files(temp.path(), SourceTag::Rails, &scan()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("model.rb"));
    }

    #[test]
    fn skips_excluded_directories() {
        let temp = TempDir::new().unwrap();
        let deps = temp.path().join("node_modules").join("pkg");
        fs::create_dir_all(&deps).unwrap();
        fs::write(deps.join("index.js"), "module.exports = {}").unwrap();
        fs::write(temp.path().join("app.js"), "function App() {}").unwrap();

        let files = collect_files(temp.path(), SourceTag::Frontend, &scan()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.js"));
    }

    #[test]
    fn recurses_into_ordinary_subdirectories() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("app").join("models");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("course.rb"), "class Course < ApplicationRecord\nend").unwrap();

        let files = collect_files(temp.path(), SourceTag::Rails, &scan()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn missing_root_is_a_source_root_error() {
        let err = collect_files(Path::new("/nonexistent/root"), SourceTag::Rails, &scan())
            .unwrap_err();
        match err {
            AtlasError::SourceRoot { source, .. } => assert_eq!(source, SourceTag::Rails),
            other => panic!("expected SourceRoot, got {other:?}"),
        }
    }

    #[test]
    fn output_order_is_stable() {
        let temp = TempDir::new().unwrap();
        for name in ["b.rb", "a.rb", "c.rb"] {
            fs::write(temp.path().join(name), "").unwrap();
        }

        let first = collect_files(temp.path(), SourceTag::Rails, &scan()).unwrap();
        let second = collect_files(temp.path(), SourceTag::Rails, &scan()).unwrap();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] <= w[1]));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycles_terminate() {
        let temp = TempDir::new().unwrap();
        let sub = temp.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("model.rb"), "").unwrap();
        // Link back to the root from inside the tree.
        std::os::unix::fs::symlink(temp.path(), sub.join("loop")).unwrap();

        let files = collect_files(temp.path(), SourceTag::Rails, &scan()).unwrap();
        assert!(files.iter().any(|f| f.ends_with("model.rb")));
    }
}
