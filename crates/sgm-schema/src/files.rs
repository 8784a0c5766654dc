//! # File References
//!
//! `File` scalars name files relative to the document they appear in. The
//! validator never touches the filesystem directly: it asks a caller-supplied
//! [`FileResolver`] to turn the declared string into a path and to report
//! whether that path exists.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Resolution and existence checks for declared file references.
pub trait FileResolver {
    /// Map a possibly relative declared path to the path to check.
    fn resolve(&self, declared: &str) -> PathBuf;

    /// Whether the resolved path exists.
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Resolves declared paths against a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct RelativeTo {
    base_dir: PathBuf,
}

impl RelativeTo {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl FileResolver for RelativeTo {
    fn resolve(&self, declared: &str) -> PathBuf {
        self.base_dir.join(declared)
    }
}

/// A fixed set of paths that exist, with no filesystem access.
///
/// Useful for validating documents held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct KnownFiles {
    files: HashSet<PathBuf>,
}

impl KnownFiles {
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

impl FileResolver for KnownFiles {
    fn resolve(&self, declared: &str) -> PathBuf {
        PathBuf::from(declared)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains(path)
    }
}
