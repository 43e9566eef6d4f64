//! Completed-upload tracking.
//!
//! The scanner only asks [`UploadTracker::is_already_uploaded`]; consumers
//! record successful transfers with [`UploadTracker::mark_uploaded`].
//! Answers are advisory: a missed duplicate only costs a redundant upload.

use super::error::{Result, UploadError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::UNIX_EPOCH;
use tracing::debug;

/// Persistent record of files already uploaded, keyed by path.
pub trait UploadTracker: Send + Sync {
    /// Whether `path` was uploaded before and is unchanged since.
    fn is_already_uploaded(&self, path: &Path) -> Result<bool>;

    /// Record a successful upload of `path` in its current state.
    fn mark_uploaded(&self, path: &Path) -> Result<()>;

    /// Drop any record for `path`.
    fn forget(&self, path: &Path) -> Result<()>;
}

/// What the scanner does when the tracker cannot answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingFailurePolicy {
    /// Treat the file as not yet uploaded and enqueue it.
    #[default]
    Proceed,
    /// Leave the file for a later scan.
    Skip,
}

/// Volatile tracker for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryTracker {
    uploaded: RwLock<HashSet<PathBuf>>,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the tracker with already-uploaded paths.
    pub fn with_uploaded<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let uploaded: HashSet<PathBuf> = paths.into_iter().map(Into::into).collect();
        Self {
            uploaded: RwLock::new(uploaded),
        }
    }

    pub fn len(&self) -> usize {
        self.uploaded.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UploadTracker for InMemoryTracker {
    fn is_already_uploaded(&self, path: &Path) -> Result<bool> {
        let uploaded = self
            .uploaded
            .read()
            .map_err(|_| UploadError::Tracking("tracker lock poisoned".to_string()))?;
        Ok(uploaded.contains(path))
    }

    fn mark_uploaded(&self, path: &Path) -> Result<()> {
        self.uploaded
            .write()
            .map_err(|_| UploadError::Tracking("tracker lock poisoned".to_string()))?
            .insert(path.to_path_buf());
        Ok(())
    }

    fn forget(&self, path: &Path) -> Result<()> {
        self.uploaded
            .write()
            .map_err(|_| UploadError::Tracking("tracker lock poisoned".to_string()))?
            .remove(path);
        Ok(())
    }
}

/// One completed upload as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Modification time in milliseconds since the Unix epoch
    pub mtime_ms: i64,
    /// BLAKE3 hex digest of the uploaded content
    pub content_hash: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TrackingFile {
    version: u32,
    uploads: HashMap<PathBuf, UploadRecord>,
}

const TRACKING_FILE_VERSION: u32 = 1;

/// Tracker persisted as a JSON document.
///
/// A file counts as uploaded when its record exists and either its mtime is
/// unchanged or its current content hashes to the recorded digest.
#[derive(Debug)]
pub struct JsonFileTracker {
    path: PathBuf,
    uploads: RwLock<HashMap<PathBuf, UploadRecord>>,
}

impl JsonFileTracker {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let uploads = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let file: TrackingFile = serde_json::from_reader(reader)?;
            if file.version != TRACKING_FILE_VERSION {
                return Err(UploadError::Tracking(format!(
                    "unsupported tracking file version {} in {}",
                    file.version,
                    path.display()
                )));
            }
            file.uploads
        } else {
            HashMap::new()
        };
        debug!(path = %path.display(), records = uploads.len(), "Tracking store opened");
        Ok(Self {
            path,
            uploads: RwLock::new(uploads),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up the stored record for `path`.
    pub fn record(&self, path: &Path) -> Result<Option<UploadRecord>> {
        Ok(self.read_uploads()?.get(path).cloned())
    }

    fn read_uploads(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<PathBuf, UploadRecord>>> {
        self.uploads
            .read()
            .map_err(|_| UploadError::Tracking("tracker lock poisoned".to_string()))
    }

    /// Write the whole store via a temp file and rename.
    fn persist(&self, uploads: &HashMap<PathBuf, UploadRecord>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let document = TrackingFile {
            version: TRACKING_FILE_VERSION,
            uploads: uploads.clone(),
        };
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&document)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl UploadTracker for JsonFileTracker {
    fn is_already_uploaded(&self, path: &Path) -> Result<bool> {
        let Some(record) = self.record(path)? else {
            return Ok(false);
        };
        if modified_millis(path)? == record.mtime_ms {
            return Ok(true);
        }
        Ok(content_hash(path)? == record.content_hash)
    }

    fn mark_uploaded(&self, path: &Path) -> Result<()> {
        let record = UploadRecord {
            mtime_ms: modified_millis(path)?,
            content_hash: content_hash(path)?,
            uploaded_at: Utc::now(),
        };
        let mut uploads = self
            .uploads
            .write()
            .map_err(|_| UploadError::Tracking("tracker lock poisoned".to_string()))?;
        uploads.insert(path.to_path_buf(), record);
        self.persist(&uploads)
    }

    fn forget(&self, path: &Path) -> Result<()> {
        let mut uploads = self
            .uploads
            .write()
            .map_err(|_| UploadError::Tracking("tracker lock poisoned".to_string()))?;
        if uploads.remove(path).is_some() {
            self.persist(&uploads)?;
        }
        Ok(())
    }
}

fn modified_millis(path: &Path) -> Result<i64> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0))
}

fn content_hash(path: &Path) -> Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hasher.finalize().to_hex().to_string())
}
