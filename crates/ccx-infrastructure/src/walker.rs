//! Candidate file enumeration
//!
//! Walks a codebase root yielding absolute paths of indexable files, pruned
//! by the ignore matcher and an extension allow-list. Per-entry I/O errors
//! never propagate: they are logged and the walk continues.

use crate::ignore_rules::IgnoreMatcher;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Enumerates candidate files under a codebase root.
///
/// `skip_hidden` adds the dot-prefixed-component rule on top of the rule
/// set; plain indexing leaves it off, snapshot building turns it on.
#[derive(Debug, Clone)]
pub struct FileWalker {
    root: PathBuf,
    extensions: HashSet<String>,
    matcher: IgnoreMatcher,
    skip_hidden: bool,
}

impl FileWalker {
    /// Create a walker over `root` accepting files with the given
    /// extensions (leading dot included, e.g. `.rs`).
    pub fn new<I, S>(root: impl Into<PathBuf>, extensions: I, matcher: IgnoreMatcher) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
            matcher,
            skip_hidden: false,
        }
    }

    /// Additionally skip any path with a dot-prefixed component
    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// The walked root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collect matching absolute file paths in OS directory order.
    ///
    /// No stable cross-run ordering is guaranteed.
    pub fn walk(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let iter = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| self.descend(entry));

        for entry in iter {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(relative) = self.relative_of(entry.path()) else {
                continue;
            };
            if self.matcher.is_ignored(&relative, false) {
                continue;
            }
            if !self.has_allowed_extension(entry.path()) {
                continue;
            }
            files.push(entry.path().to_path_buf());
        }

        files
    }

    /// Pruning predicate applied while descending directories
    fn descend(&self, entry: &walkdir::DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        if self.skip_hidden
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with('.'))
        {
            return false;
        }
        if entry.file_type().is_dir() {
            if let Some(relative) = self.relative_of(entry.path()) {
                return !self.matcher.is_ignored(&relative, true);
            }
        }
        true
    }

    /// Forward-slash path relative to the root
    fn relative_of(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.root)
            .ok()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
    }

    fn has_allowed_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&format!(".{ext}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn relative_set(walker: &FileWalker) -> Vec<String> {
        let root = walker.root().to_path_buf();
        let mut paths: Vec<String> = walker
            .walk()
            .into_iter()
            .map(|p| {
                p.strip_prefix(&root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        paths.sort();
        paths
    }

    #[test]
    fn yields_only_allowed_extensions() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.rs", "fn main() {}");
        touch(dir.path(), "b.txt", "notes");
        touch(dir.path(), "sub/c.py", "x = 1");

        let walker = FileWalker::new(
            dir.path(),
            [".rs", ".py"],
            IgnoreMatcher::new(Vec::<String>::new()),
        );
        assert_eq!(relative_set(&walker), vec!["a.rs", "sub/c.py"]);
    }

    #[test]
    fn prunes_ignored_directories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/main.rs", "fn main() {}");
        touch(dir.path(), "target/debug/build.rs", "fn b() {}");
        touch(dir.path(), "node_modules/x/y.js", "let a;");

        let walker = FileWalker::new(
            dir.path(),
            [".rs", ".js"],
            IgnoreMatcher::new(["target/**", "node_modules/"]),
        );
        assert_eq!(relative_set(&walker), vec!["src/main.rs"]);
    }

    #[test]
    fn hidden_components_skipped_only_when_asked() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".hidden/a.rs", "fn a() {}");
        touch(dir.path(), "visible/b.rs", "fn b() {}");

        let matcher = IgnoreMatcher::new(Vec::<String>::new());
        let plain = FileWalker::new(dir.path(), [".rs"], matcher.clone());
        assert_eq!(relative_set(&plain), vec![".hidden/a.rs", "visible/b.rs"]);

        let syncing = FileWalker::new(dir.path(), [".rs"], matcher).skip_hidden(true);
        assert_eq!(relative_set(&syncing), vec!["visible/b.rs"]);
    }

    #[test]
    fn ignored_files_are_excluded() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.py", "x = 1");
        touch(dir.path(), "b.py", "y = 2");

        let walker = FileWalker::new(dir.path(), [".py"], IgnoreMatcher::new(["b.*"]));
        assert_eq!(relative_set(&walker), vec!["a.py"]);
    }
}
