//! Error types for the upload pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Upload pipeline error type
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not a folder", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("Tracking store error: {0}")]
    Tracking(String),

    #[error("Session store error: {0}")]
    Session(String),

    #[error("Remote service error: {0}")]
    Remote(String),

    #[error("Upload queue closed")]
    QueueClosed,

    #[error("Scan of {} panicked", .0.display())]
    ScanPanicked(PathBuf),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, UploadError>;
