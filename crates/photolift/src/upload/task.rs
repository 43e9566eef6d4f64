//! Upload tasks handed from the scanner to upload consumers.

use super::remote::RemoteClient;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One file to transfer. Immutable once built; ownership moves to the
/// consumer when published.
#[derive(Clone)]
pub struct UploadTask {
    path: PathBuf,
    collection_id: String,
    delete_on_success: bool,
    client: Arc<dyn RemoteClient>,
}

impl UploadTask {
    /// Absolute path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolved collection id; empty means "no collection".
    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    /// `None` when the task has no collection.
    pub fn collection(&self) -> Option<&str> {
        if self.collection_id.is_empty() {
            None
        } else {
            Some(&self.collection_id)
        }
    }

    /// Whether the consumer should delete the local file after a successful upload.
    pub fn delete_on_success(&self) -> bool {
        self.delete_on_success
    }

    /// Client to perform the transfer with.
    pub fn client(&self) -> &Arc<dyn RemoteClient> {
        &self.client
    }
}

impl fmt::Debug for UploadTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadTask")
            .field("path", &self.path)
            .field("collection_id", &self.collection_id)
            .field("delete_on_success", &self.delete_on_success)
            .finish_non_exhaustive()
    }
}

/// Per-job half of task construction: the parts every task of a job shares.
#[derive(Clone)]
pub struct TaskBuilder {
    client: Arc<dyn RemoteClient>,
    delete_on_success: bool,
}

impl TaskBuilder {
    pub fn new(client: Arc<dyn RemoteClient>, delete_on_success: bool) -> Self {
        Self {
            client,
            delete_on_success,
        }
    }

    /// Build a task. Pure: no I/O, no failure modes.
    pub fn build(&self, path: impl Into<PathBuf>, collection_id: impl Into<String>) -> UploadTask {
        UploadTask {
            path: path.into(),
            collection_id: collection_id.into(),
            delete_on_success: self.delete_on_success,
            client: Arc::clone(&self.client),
        }
    }
}
