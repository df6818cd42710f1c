//! Discovery of Python source files.
//!
//! [`FileWalker`] walks one directory with the `ignore` crate, so
//! `.gitignore` and `.ignore` patterns and hidden entries are respected.
//! [`collect_inputs`] expands a mixed list of files and directories into
//! the files to convert.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use pyi_core::ScanConfig;

use crate::error::ScanError;

/// Directories that never hold sources worth stubbing.
const SKIP_DIRECTORIES: &[&str] = &[
    "__pycache__",
    ".git",
    ".hg",
    ".tox",
    ".nox",
    ".venv",
    "venv",
    ".mypy_cache",
    ".pytest_cache",
    "node_modules",
];

/// Extension of the files picked up inside directories.
const PYTHON_EXTENSION: &str = "py";

/// A file walker that discovers `*.py` files in a directory tree.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use pyi_scanner::FileWalker;
///
/// let walker = FileWalker::new(Utf8Path::new("./src"))?.with_skip_dirs(&["build"]);
/// for path in walker.collect_paths()? {
///     println!("{path}");
/// }
/// # Ok::<(), pyi_scanner::ScanError>(())
/// ```
#[derive(Debug)]
pub struct FileWalker {
    root: Utf8PathBuf,
    /// Additional directory names to skip.
    skip_dirs: Vec<String>,
    follow_links: bool,
}

impl FileWalker {
    /// Creates a walker rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if `root` doesn't exist or isn't a
    /// directory.
    pub fn new(root: &Utf8Path) -> Result<Self, ScanError> {
        if !root.exists() {
            return Err(ScanError::config(format!("path does not exist: {root}")));
        }
        if !root.is_dir() {
            return Err(ScanError::config(format!("path is not a directory: {root}")));
        }

        Ok(Self {
            root: root.to_owned(),
            skip_dirs: Vec::new(),
            follow_links: false,
        })
    }

    /// Adds directory names to skip, on top of the built-in list
    /// (`__pycache__`, `.venv`, ...).
    #[must_use]
    pub fn with_skip_dirs<I>(mut self, dirs: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.skip_dirs
            .extend(dirs.into_iter().map(|dir| dir.as_ref().to_owned()));
        self
    }

    /// Configures whether to follow symbolic links. Off by default.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Collects every `*.py` file below the root, in walk order.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Walk`] if directory traversal fails, or
    /// [`ScanError::NonUtf8Path`] for a path that is not UTF-8.
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, ScanError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = result?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let utf8_path =
                Utf8Path::from_path(path).ok_or_else(|| ScanError::NonUtf8Path(path.to_owned()))?;

            if is_python_file(utf8_path) {
                paths.push(utf8_path.to_owned());
            }
        }

        Ok(paths)
    }

    /// Skipped directories are pruned, so nothing below them is read.
    fn build_walker(&self) -> ignore::Walk {
        let skip_dirs = self.skip_dirs.clone();
        WalkBuilder::new(&self.root)
            .standard_filters(true)
            .follow_links(self.follow_links)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                // The root is walked even when its own name is on a skip list.
                entry.depth() == 0
                    || !entry.file_type().is_some_and(|ft| ft.is_dir())
                    || !entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| is_skipped_dir_name(name, &skip_dirs))
            })
            .build()
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

fn is_python_file(path: &Utf8Path) -> bool {
    path.extension() == Some(PYTHON_EXTENSION)
}

fn is_skipped_dir_name(name: &str, extra: &[String]) -> bool {
    SKIP_DIRECTORIES.contains(&name) || extra.iter().any(|dir| dir == name)
}

/// Expands `inputs` into the list of files to convert.
///
/// Files are taken as given, whatever their extension. Directories are
/// walked for `*.py` files using the walking options of `config`.
///
/// # Errors
///
/// Returns the first fatal walk error. A missing input is reported as
/// [`ScanError::Read`] so the caller can warn and go on.
pub fn collect_inputs(
    inputs: &[Utf8PathBuf],
    config: &ScanConfig,
) -> Result<Vec<Result<Utf8PathBuf, ScanError>>, ScanError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let walker = FileWalker::new(input)?
                .with_skip_dirs(&config.skip_dirs)
                .with_follow_links(config.follow_links);
            files.extend(walker.collect_paths()?.into_iter().map(Ok));
        } else if input.exists() {
            files.push(Ok(input.clone()));
        } else {
            files.push(Err(ScanError::read(
                input.clone(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
            )));
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Utf8Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("has parent")).expect("create dirs");
        fs::write(&path, "x = 1\n").expect("write file");
    }

    #[test]
    fn test_is_python_file() {
        assert!(is_python_file(Utf8Path::new("foo.py")));
        assert!(is_python_file(Utf8Path::new("pkg/bar.py")));
        assert!(!is_python_file(Utf8Path::new("foo.pyi")));
        assert!(!is_python_file(Utf8Path::new("foo.pyc")));
        assert!(!is_python_file(Utf8Path::new("foo")));
    }

    #[test]
    fn test_is_skipped_dir_name() {
        let extra = vec!["generated".to_owned()];

        assert!(is_skipped_dir_name("__pycache__", &extra));
        assert!(is_skipped_dir_name("node_modules", &[]));
        assert!(is_skipped_dir_name("generated", &extra));

        assert!(!is_skipped_dir_name("pkg", &extra));
        assert!(!is_skipped_dir_name("generated", &[]));
    }

    #[test]
    fn test_collect_paths_prunes_skipped_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 tempdir");
        touch(root, "pkg/mod.py");
        touch(root, "pkg/notes.txt");
        touch(root, "pkg/node_modules/dep.py");
        touch(root, "pkg/__pycache__/mod.py");
        touch(root, "build/out.py");
        touch(root, "top.py");

        let paths = FileWalker::new(root)
            .expect("walker")
            .with_skip_dirs(&["build"])
            .collect_paths()
            .expect("walk");

        assert_eq!(paths, vec![root.join("pkg/mod.py"), root.join("top.py")]);
    }

    #[test]
    fn test_root_named_like_a_skipped_dir_is_walked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 tempdir").join("venv");
        touch(&root, "mod.py");
        touch(&root, "venv/inner.py");

        let paths = FileWalker::new(&root)
            .expect("walker")
            .collect_paths()
            .expect("walk");

        assert_eq!(paths, vec![root.join("mod.py")]);
    }

    #[test]
    fn test_with_follow_links() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 tempdir");
        let walker = FileWalker::new(root).expect("walker").with_follow_links(true);
        assert!(walker.follow_links);
        assert_eq!(walker.root(), root);
    }
}
