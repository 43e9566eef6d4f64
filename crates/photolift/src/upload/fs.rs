//! Filesystem predicates used to classify walked entries.

use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn is_dir(&self, path: &Path) -> bool;

    /// True for regular files, following symlinks.
    fn is_file(&self, path: &Path) -> bool;
}

/// The real local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
