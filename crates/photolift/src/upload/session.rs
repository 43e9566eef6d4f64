//! Resumable upload sessions.
//!
//! Consumers store the upload URL of an in-progress transfer here so an
//! interrupted upload can resume. The scanner never reads or writes it.

use super::error::{Result, UploadError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Persistent map from local path to resumable upload URL.
pub trait UploadSessionStore: Send + Sync {
    fn get(&self, path: &Path) -> Result<Option<String>>;

    fn set(&self, path: &Path, upload_url: &str) -> Result<()>;

    fn remove(&self, path: &Path) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<PathBuf, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> UploadError {
    UploadError::Session("session store lock poisoned".to_string())
}

impl UploadSessionStore for InMemorySessionStore {
    fn get(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.sessions.read().map_err(|_| poisoned())?.get(path).cloned())
    }

    fn set(&self, path: &Path, upload_url: &str) -> Result<()> {
        self.sessions
            .write()
            .map_err(|_| poisoned())?
            .insert(path.to_path_buf(), upload_url.to_string());
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.sessions.write().map_err(|_| poisoned())?.remove(path);
        Ok(())
    }
}
