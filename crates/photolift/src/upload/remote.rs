//! Remote photo service contract.
//!
//! The scanner only resolves collections; transfers happen in consumers
//! through the same client, which every [`UploadTask`](super::task::UploadTask)
//! carries a handle to.

use super::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named remote grouping (an album).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub title: String,
}

/// Client for the remote photo library. Shared across concurrent jobs.
pub trait RemoteClient: Send + Sync {
    /// Return the collection titled `name`, creating it if needed.
    fn get_or_create_collection_by_name(&self, name: &str) -> Result<Collection>;

    /// Transfer a file, optionally adding it to a collection. Returns the
    /// remote media item id.
    fn upload_file(&self, path: &Path, collection_id: Option<&str>) -> Result<String>;
}
