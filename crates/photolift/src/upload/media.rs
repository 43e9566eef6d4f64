//! Media type detection by file extension.

use std::path::Path;

const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "heic", "heif", "tif", "tiff", "bmp", "ico", "avif",
    // RAW formats accepted by the photo service
    "cr2", "cr3", "nef", "arw", "dng", "orf", "rw2", "raf",
];

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "m4v", "avi", "mkv", "wmv", "mpg", "mpeg", "3gp", "3g2", "mts", "m2ts", "m2t",
    "asf", "divx", "mod", "tod", "mmv", "webm",
];

/// What kind of media a file holds.
///
/// Only [`MediaKind::Video`] changes eligibility; photos and anything else
/// are treated alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Other,
}

impl MediaKind {
    /// Classify a path by its (case-insensitive) extension.
    pub fn of(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Other;
        };
        let ext = ext.to_ascii_lowercase();
        if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Photo
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Video
        } else {
            Self::Other
        }
    }

    pub fn is_video(self) -> bool {
        self == Self::Video
    }
}
