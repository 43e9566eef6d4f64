//! Upload pipeline - folder scanning and task dispatch
//!
//! Walks source folders, filters entries, skips files already uploaded,
//! resolves a collection per folder and publishes upload tasks to a queue
//! drained by upload consumers.

pub mod cancel;
pub mod collection;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod filter;
pub mod fs;
pub mod job;
pub mod media;
pub mod patterns;
pub mod queue;
pub mod remote;
pub mod scan_path;
pub mod scanner;
pub mod session;
pub mod task;
pub mod tracking;

// Re-exports for CLI usage
pub use cancel::CancellationToken;
pub use collection::{get_or_create_collection_id, CollectionResolver};
pub use config::{JobConfig, UploadConfig};
pub use dispatch::{Dispatcher, JobOutcome};
pub use error::{Result, UploadError};
pub use events::{RecordingObserver, ScanEvent, ScanObserver, TracingObserver};
pub use filter::{EntryKind, Filter};
pub use fs::{FileSystem, LocalFileSystem};
pub use job::{Job, JobOptions, JobOptionsBuilder};
pub use media::MediaKind;
pub use patterns::{build_matcher, matches, normalize_glob_pattern, PatternSet};
pub use queue::UploadQueue;
pub use remote::{Collection, RemoteClient};
pub use scanner::{ScanStats, Scanner};
pub use session::{InMemorySessionStore, UploadSessionStore};
pub use task::{TaskBuilder, UploadTask};
pub use tracking::{InMemoryTracker, JsonFileTracker, TrackingFailurePolicy, UploadRecord, UploadTracker};
