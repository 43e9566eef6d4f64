//! Per-directory collection resolution.
//!
//! Every file in a directory maps to the same collection, so the remote
//! lookup runs once per directory per scan. Failures degrade to the empty id
//! ("no collection") and are cached too: a failing service is asked once per
//! directory, and the upload goes ahead without a collection.

use super::events::{ScanEvent, ScanObserver};
use super::remote::RemoteClient;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolve `name` to a collection id, or `""` when empty or on failure.
pub fn get_or_create_collection_id(
    client: &dyn RemoteClient,
    name: &str,
    observer: &dyn ScanObserver,
) -> String {
    if name.is_empty() {
        return String::new();
    }

    match client.get_or_create_collection_by_name(name) {
        Ok(collection) => collection.id,
        Err(e) => {
            observer.on_event(&ScanEvent::CollectionFailed {
                name: name.to_string(),
                message: e.to_string(),
            });
            String::new()
        }
    }
}

/// Collection name for a file: the base name of its containing directory.
pub fn collection_name_for(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lazily filled directory → collection id map, scoped to one scan.
pub struct CollectionResolver<'a> {
    client: &'a dyn RemoteClient,
    observer: &'a dyn ScanObserver,
    resolved: HashMap<PathBuf, String>,
    failures: u64,
}

impl<'a> CollectionResolver<'a> {
    pub fn new(client: &'a dyn RemoteClient, observer: &'a dyn ScanObserver) -> Self {
        Self {
            client,
            observer,
            resolved: HashMap::new(),
            failures: 0,
        }
    }

    /// Collection id for files directly inside `dir`.
    pub fn resolve(&mut self, dir: &Path) -> String {
        if let Some(id) = self.resolved.get(dir) {
            return id.clone();
        }

        let name = collection_name_for(dir);
        let id = get_or_create_collection_id(self.client, &name, self.observer);
        if id.is_empty() && !name.is_empty() {
            self.failures += 1;
        }
        self.resolved.insert(dir.to_path_buf(), id.clone());
        id
    }

    /// Number of directories whose collection could not be resolved.
    pub fn failures(&self) -> u64 {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::error::{Result, UploadError};
    use crate::upload::events::RecordingObserver;
    use crate::upload::remote::Collection;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingClient {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingClient {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl RemoteClient for CountingClient {
        fn get_or_create_collection_by_name(&self, name: &str) -> Result<Collection> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(UploadError::Remote("quota exceeded".to_string()));
            }
            Ok(Collection {
                id: format!("id-{name}"),
                title: name.to_string(),
            })
        }

        fn upload_file(&self, _path: &Path, _collection_id: Option<&str>) -> Result<String> {
            Err(UploadError::Remote("not used".to_string()))
        }
    }

    #[test]
    fn empty_name_skips_the_remote_call() {
        let client = CountingClient::new(false);
        let observer = RecordingObserver::new();
        assert_eq!(get_or_create_collection_id(&client, "", &observer), "");
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failure_yields_empty_id_and_an_event() {
        let client = CountingClient::new(true);
        let observer = RecordingObserver::new();
        assert_eq!(get_or_create_collection_id(&client, "vacation", &observer), "");

        let events = observer.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ScanEvent::CollectionFailed { name, .. } if name == "vacation"));
    }

    #[test]
    fn resolves_once_per_directory() {
        let client = CountingClient::new(false);
        let observer = RecordingObserver::new();
        let mut resolver = CollectionResolver::new(&client, &observer);

        assert_eq!(resolver.resolve(Path::new("/src/vacation")), "id-vacation");
        assert_eq!(resolver.resolve(Path::new("/src/vacation")), "id-vacation");
        assert_eq!(resolver.resolve(Path::new("/src/party")), "id-party");
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failures_are_cached_for_the_scan() {
        let client = CountingClient::new(true);
        let observer = RecordingObserver::new();
        let mut resolver = CollectionResolver::new(&client, &observer);

        assert_eq!(resolver.resolve(Path::new("/src/vacation")), "");
        assert_eq!(resolver.resolve(Path::new("/src/vacation")), "");
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.failures(), 1);
    }

    #[test]
    fn same_base_name_in_different_directories_resolves_separately() {
        let client = CountingClient::new(false);
        let observer = RecordingObserver::new();
        let mut resolver = CollectionResolver::new(&client, &observer);

        resolver.resolve(Path::new("/src/2019/summer"));
        resolver.resolve(Path::new("/src/2020/summer"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn name_is_the_directory_base_name() {
        assert_eq!(collection_name_for(Path::new("/src/vacation")), "vacation");
        assert_eq!(collection_name_for(Path::new("/")), "");
    }
}
