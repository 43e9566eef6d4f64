//! Photolift - Core Library
//!
//! Folder scanning and upload task dispatch for a remote photo library.

pub mod upload;

pub use upload::{
    Dispatcher, Job, JobOptions, RemoteClient, ScanStats, Scanner, UploadConfig, UploadError,
    UploadQueue, UploadTask, UploadTracker,
};
