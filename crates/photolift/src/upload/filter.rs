//! Inclusion/exclusion decision for scanned entries.
//!
//! Precedence, highest first:
//! 1. Any exclude pattern match disallows the entry (files and directories).
//! 2. Directories that are not excluded are allowed, so the walk descends.
//! 3. Videos need `include_videos`. Every other file, photo or not, passes.
//! 4. With include patterns configured, a file's full path must match one.
//!    Include patterns are not applied to ancestor directories.

use super::error::Result;
use super::media::MediaKind;
use super::patterns::PatternSet;
use std::path::Path;

/// Whether a walked entry is a directory or something that could become a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// Pure, stateless predicate built once per job.
#[derive(Debug, Clone)]
pub struct Filter {
    include: PatternSet,
    exclude: PatternSet,
    include_videos: bool,
}

impl Filter {
    /// Compile the pattern lists. Fails on the first invalid glob.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S], include_videos: bool) -> Result<Self> {
        Ok(Self {
            include: PatternSet::compile(include)?,
            exclude: PatternSet::compile(exclude)?,
            include_videos,
        })
    }

    /// Decide whether an entry is allowed.
    ///
    /// `rel_path` is relative to the job's source folder. An empty path
    /// (the source folder itself) is always allowed.
    ///
    /// Include patterns and the video rule gate files only. A directory is
    /// disallowed only when an exclude pattern matches it.
    pub fn is_allowed(&self, rel_path: &Path, kind: EntryKind) -> bool {
        let rel = to_slash_path(rel_path);
        if rel.is_empty() {
            return true;
        }

        if self.exclude.matches(&rel) {
            return false;
        }

        if kind == EntryKind::Directory {
            return true;
        }

        if MediaKind::of(rel_path).is_video() && !self.include_videos {
            return false;
        }

        self.include.is_empty() || self.include.matches_exact(&rel)
    }

    pub fn include_videos(&self) -> bool {
        self.include_videos
    }
}

/// Join path components with `/` so patterns behave the same on every platform.
pub(crate) fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
