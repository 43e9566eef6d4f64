//! End-to-end tests for the scan pipeline
//!
//! Each test builds a real folder tree, scans it and inspects the tasks that
//! reach the queue.

use photolift::upload::{
    queue, CancellationToken, Collection, Dispatcher, InMemorySessionStore, InMemoryTracker, Job,
    JobOptions, JsonFileTracker, RecordingObserver, RemoteClient, Result, ScanEvent, ScanObserver,
    ScanStats, Scanner, TrackingFailurePolicy, UploadError, UploadTask, UploadTracker,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

/// Create a test environment with temp directories
struct TestEnv {
    /// Temp directory (cleaned up on drop)
    _temp: TempDir,
    /// Source folder for photos
    pub source_dir: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let source_dir = temp.path().join("src");
        fs::create_dir_all(&source_dir).expect("Failed to create source dir");
        Self {
            _temp: temp,
            source_dir,
        }
    }

    fn write_file(&self, name: &str) -> PathBuf {
        let path = self.source_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }
        fs::write(&path, name.as_bytes()).expect("Failed to write file");
        path
    }

    fn vacation(&self) -> (PathBuf, PathBuf) {
        (
            self.write_file("vacation/photo1.jpg"),
            self.write_file("vacation/photo2.mp4"),
        )
    }
}

/// Remote client with scripted collection ids and per-name call counts.
#[derive(Default)]
struct FakeClient {
    ids: Mutex<Vec<(String, String)>>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl FakeClient {
    fn with_collection(name: &str, id: &str) -> Self {
        let client = Self::default();
        client
            .ids
            .lock()
            .unwrap()
            .push((name.to_string(), id.to_string()));
        client
    }

    fn failing_for(name: &str) -> Self {
        Self {
            failing: [name.to_string()].into_iter().collect(),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteClient for FakeClient {
    fn get_or_create_collection_by_name(&self, name: &str) -> Result<Collection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(name) {
            return Err(UploadError::Remote(format!("cannot create {name}")));
        }
        let ids = self.ids.lock().unwrap();
        let id = ids
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| id.clone())
            .unwrap_or_else(|| format!("auto-{name}"));
        Ok(Collection {
            id,
            title: name.to_string(),
        })
    }

    fn upload_file(&self, _path: &Path, _collection_id: Option<&str>) -> Result<String> {
        Err(UploadError::Remote("uploads are not part of scanning".to_string()))
    }
}

/// Tracker whose lookups always fail.
struct BrokenTracker;

impl UploadTracker for BrokenTracker {
    fn is_already_uploaded(&self, _path: &Path) -> Result<bool> {
        Err(UploadError::Tracking("store offline".to_string()))
    }

    fn mark_uploaded(&self, _path: &Path) -> Result<()> {
        Err(UploadError::Tracking("store offline".to_string()))
    }

    fn forget(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Cancels the scan once `after` tasks were enqueued.
struct CancelAfter {
    token: CancellationToken,
    after: usize,
    seen: AtomicUsize,
}

impl ScanObserver for CancelAfter {
    fn on_event(&self, event: &ScanEvent) {
        if let ScanEvent::Enqueued { .. } = event {
            if self.seen.fetch_add(1, Ordering::SeqCst) + 1 >= self.after {
                self.token.cancel();
            }
        }
    }
}

fn job_with(
    env: &TestEnv,
    options: JobOptions,
    client: Arc<FakeClient>,
    tracker: Arc<dyn UploadTracker>,
) -> Job {
    Job::new(
        &env.source_dir,
        options,
        client,
        tracker,
        Arc::new(InMemorySessionStore::new()),
    )
    .unwrap()
}

fn job(env: &TestEnv, options: JobOptions) -> Job {
    job_with(
        env,
        options,
        Arc::new(FakeClient::default()),
        Arc::new(InMemoryTracker::new()),
    )
}

/// Scan with a recording observer and collect every queued task.
fn scan_all(job: &Job) -> (ScanStats, Vec<UploadTask>, Vec<ScanEvent>) {
    let observer = Arc::new(RecordingObserver::new());
    let scanner = Scanner::new().with_observer(observer.clone());
    let (queue, rx) = queue::unbounded();
    let stats = scanner.scan(job, &queue).unwrap();
    drop(queue);
    (stats, rx.into_iter().collect(), observer.events())
}

fn rel_paths(env: &TestEnv, tasks: &[UploadTask]) -> Vec<String> {
    tasks
        .iter()
        .map(|t| {
            t.path()
                .strip_prefix(&env.source_dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_vacation_photo_gets_collection_and_video_is_skipped() {
    let env = TestEnv::new();
    let (photo, _video) = env.vacation();
    let client = Arc::new(FakeClient::with_collection("vacation", "C1"));
    let options = JobOptions::builder().create_collections(true).build();
    let job = job_with(&env, options, client, Arc::new(InMemoryTracker::new()));

    let (stats, tasks, _) = scan_all(&job);

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].path(), photo);
    assert_eq!(tasks[0].collection_id(), "C1");
    assert!(!tasks[0].delete_on_success());
    assert_eq!(stats.tasks_enqueued, 1);
    assert_eq!(stats.files_filtered, 1);
}

#[test]
fn test_already_uploaded_photo_produces_no_tasks() {
    let env = TestEnv::new();
    let (photo, _video) = env.vacation();
    let tracker = Arc::new(InMemoryTracker::with_uploaded([photo.clone()]));
    let options = JobOptions::builder().create_collections(true).build();
    let client = Arc::new(FakeClient::with_collection("vacation", "C1"));
    let job = job_with(&env, options, client.clone(), tracker);

    let (stats, tasks, events) = scan_all(&job);

    assert!(tasks.is_empty());
    assert_eq!(stats.already_uploaded, 1);
    assert!(events.contains(&ScanEvent::AlreadyUploaded { path: photo }));
    // No task, no collection lookup.
    assert_eq!(client.calls(), 0);
}

#[test]
fn test_exclude_beats_include() {
    let env = TestEnv::new();
    env.vacation();

    let without_videos = JobOptions::builder()
        .include_patterns(["*"])
        .exclude_patterns(["*.jpg"])
        .build();
    let (_, tasks, _) = scan_all(&job(&env, without_videos));
    assert!(tasks.is_empty());

    let with_videos = JobOptions::builder()
        .include_videos(true)
        .include_patterns(["*"])
        .exclude_patterns(["*.jpg"])
        .build();
    let (_, tasks, _) = scan_all(&job(&env, with_videos));
    assert_eq!(rel_paths(&env, &tasks), vec!["vacation/photo2.mp4"]);
}

#[test]
fn test_videos_need_the_flag_even_when_patterns_match() {
    let env = TestEnv::new();
    env.vacation();
    let options = JobOptions::builder().include_patterns(["*.mp4"]).build();
    let (_, tasks, _) = scan_all(&job(&env, options));
    assert!(tasks.is_empty());
}

#[test]
fn test_excluded_directory_is_pruned() {
    let env = TestEnv::new();
    env.write_file("keep/a.jpg");
    env.write_file("private/b.jpg");
    env.write_file("private/deeper/c.jpg");
    env.write_file("private/deeper/still/d.jpg");

    let options = JobOptions::builder().exclude_patterns(["private"]).build();
    let (stats, tasks, events) = scan_all(&job(&env, options));

    assert_eq!(rel_paths(&env, &tasks), vec!["keep/a.jpg"]);
    assert_eq!(stats.dirs_pruned, 1);
    // Nothing below the pruned folder was even looked at.
    assert_eq!(stats.files_seen, 1);
    let private = env.source_dir.join("private");
    assert!(events.contains(&ScanEvent::Pruned {
        path: private.clone()
    }));
    assert!(!events.iter().any(|e| matches!(
        e,
        ScanEvent::Pruned { path } if path != &private
    )));
}

#[test]
fn test_include_patterns_do_not_prune_folders() {
    let env = TestEnv::new();
    env.write_file("2019/summer/a.jpg");
    env.write_file("2019/winter/b.jpg");
    env.write_file("2020/c.jpg");

    let options = JobOptions::builder().include_patterns(["2019/**"]).build();
    let (stats, tasks, _) = scan_all(&job(&env, options));

    assert_eq!(
        rel_paths(&env, &tasks),
        vec!["2019/summer/a.jpg", "2019/winter/b.jpg"]
    );
    assert_eq!(stats.dirs_pruned, 0);
}

#[test]
fn test_non_video_files_of_any_type_are_enqueued() {
    let env = TestEnv::new();
    env.write_file("notes.txt");
    env.write_file("shot.pef");
    env.write_file("img.jxl");
    env.write_file("clip.mp4");

    let everything = JobOptions::builder().include_patterns(["*"]).build();
    let (stats, tasks, _) = scan_all(&job(&env, everything));
    assert_eq!(rel_paths(&env, &tasks), vec!["img.jxl", "notes.txt", "shot.pef"]);
    assert_eq!(stats.files_filtered, 1);

    let (_, tasks, _) = scan_all(&job(&env, JobOptions::default()));
    assert_eq!(rel_paths(&env, &tasks), vec!["img.jxl", "notes.txt", "shot.pef"]);
}

#[test]
fn test_include_pattern_does_not_match_through_folder_names() {
    let env = TestEnv::new();
    env.write_file("holiday.png/a.jpg");
    env.write_file("holiday/b.png");

    let options = JobOptions::builder().include_patterns(["*.png"]).build();
    let (_, tasks, _) = scan_all(&job(&env, options));
    assert_eq!(rel_paths(&env, &tasks), vec!["holiday/b.png"]);
}

#[test]
fn test_relative_source_produces_absolute_task_paths() {
    let cwd = std::env::current_dir().unwrap();
    let tmp = TempDir::new_in(&cwd).unwrap();
    fs::write(tmp.path().join("a.jpg"), b"x").unwrap();
    let relative = tmp.path().strip_prefix(&cwd).unwrap().to_path_buf();
    assert!(relative.is_relative());

    let job = Job::new(
        &relative,
        JobOptions::default(),
        Arc::new(FakeClient::default()),
        Arc::new(InMemoryTracker::new()),
        Arc::new(InMemorySessionStore::new()),
    )
    .unwrap();
    let (_, tasks, _) = scan_all(&job);

    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].path().is_absolute());
    assert_eq!(tasks[0].path(), cwd.join(&relative).join("a.jpg"));
}

#[test]
fn test_collection_failure_still_enqueues() {
    let env = TestEnv::new();
    env.write_file("vacation/a.jpg");
    env.write_file("vacation/b.jpg");
    env.write_file("party/c.jpg");

    let client = Arc::new(FakeClient::failing_for("vacation"));
    let options = JobOptions::builder().create_collections(true).build();
    let job = job_with(&env, options, client.clone(), Arc::new(InMemoryTracker::new()));

    let (stats, tasks, events) = scan_all(&job);

    let ids: Vec<_> = tasks.iter().map(|t| t.collection_id().to_string()).collect();
    assert_eq!(ids, vec!["auto-party", "", ""]);
    assert_eq!(stats.collection_failures, 1);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, ScanEvent::CollectionFailed { .. }))
            .count(),
        1
    );
    // One lookup per folder, failures included.
    assert_eq!(client.calls(), 2);
}

#[test]
fn test_collections_are_off_unless_requested() {
    let env = TestEnv::new();
    env.write_file("vacation/a.jpg");
    let client = Arc::new(FakeClient::default());
    let job = job_with(
        &env,
        JobOptions::default(),
        client.clone(),
        Arc::new(InMemoryTracker::new()),
    );

    let (_, tasks, _) = scan_all(&job);
    assert_eq!(tasks[0].collection(), None);
    assert_eq!(client.calls(), 0);
}

#[test]
fn test_tracking_failure_policy() {
    let env = TestEnv::new();
    env.write_file("a.jpg");

    let proceed = job_with(
        &env,
        JobOptions::default(),
        Arc::new(FakeClient::default()),
        Arc::new(BrokenTracker),
    );
    let (stats, tasks, events) = scan_all(&proceed);
    assert_eq!(tasks.len(), 1);
    assert_eq!(stats.tracking_errors, 1);
    assert!(events.iter().any(|e| matches!(
        e,
        ScanEvent::TrackingFailed {
            policy: TrackingFailurePolicy::Proceed,
            ..
        }
    )));

    let skip = job_with(
        &env,
        JobOptions::builder()
            .on_tracking_error(TrackingFailurePolicy::Skip)
            .build(),
        Arc::new(FakeClient::default()),
        Arc::new(BrokenTracker),
    );
    let (stats, tasks, _) = scan_all(&skip);
    assert!(tasks.is_empty());
    assert_eq!(stats.tracking_errors, 1);
}

#[test]
fn test_delete_flag_is_carried_on_tasks() {
    let env = TestEnv::new();
    env.write_file("a.jpg");
    let options = JobOptions::builder().delete_after_upload(true).build();
    let (_, tasks, _) = scan_all(&job(&env, options));
    assert!(tasks[0].delete_on_success());
}

// ============================================================================
// Ordering, backpressure, termination
// ============================================================================

#[test]
fn test_tasks_follow_preorder_walk() {
    let env = TestEnv::new();
    env.write_file("z.jpg");
    env.write_file("b/d/e.jpg");
    env.write_file("a.jpg");
    env.write_file("b/c.jpg");

    let (_, tasks, events) = scan_all(&job(&env, JobOptions::default()));

    let expected = vec!["a.jpg", "b/c.jpg", "b/d/e.jpg", "z.jpg"];
    assert_eq!(rel_paths(&env, &tasks), expected);

    let enqueued: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Enqueued { path, .. } => Some(path.clone()),
            _ => None,
        })
        .collect();
    let queued: Vec<_> = tasks.iter().map(|t| t.path().to_path_buf()).collect();
    assert_eq!(enqueued, queued);
}

#[test]
fn test_bounded_queue_delivers_everything_in_order() {
    let env = TestEnv::new();
    let mut expected = Vec::new();
    for i in 0..20 {
        expected.push(env.write_file(&format!("roll/{i:02}.jpg")));
    }

    let job = job(&env, JobOptions::default());
    let (queue, rx) = queue::bounded(1);
    let consumer = thread::spawn(move || {
        rx.into_iter()
            .map(|t| t.path().to_path_buf())
            .collect::<Vec<_>>()
    });

    let scanner = Scanner::new().with_observer(Arc::new(RecordingObserver::new()));
    let stats = scanner.scan(&job, &queue).unwrap();
    drop(queue);

    assert_eq!(stats.tasks_enqueued, 20);
    assert_eq!(consumer.join().unwrap(), expected);
}

#[test]
fn test_closed_queue_stops_the_walk_without_failing() {
    let env = TestEnv::new();
    env.write_file("a.jpg");
    env.write_file("b.jpg");

    let observer = Arc::new(RecordingObserver::new());
    let scanner = Scanner::new().with_observer(observer.clone());
    let (queue, rx) = queue::bounded(4);
    drop(rx);

    let stats = scanner.scan(&job(&env, JobOptions::default()), &queue).unwrap();

    assert!(stats.queue_closed);
    assert_eq!(stats.tasks_enqueued, 0);
    let closed = observer
        .events()
        .into_iter()
        .filter(|e| matches!(e, ScanEvent::QueueClosed { .. }))
        .count();
    assert_eq!(closed, 1);
}

#[test]
fn test_cancel_before_scan_enqueues_nothing() {
    let env = TestEnv::new();
    env.write_file("a.jpg");

    let token = CancellationToken::new();
    token.cancel();
    let scanner = Scanner::new().with_observer(Arc::new(RecordingObserver::new()));
    let (queue, rx) = queue::unbounded();
    let stats = scanner
        .scan_with_cancel(&job(&env, JobOptions::default()), &queue, &token)
        .unwrap();
    drop(queue);

    assert!(stats.cancelled);
    assert_eq!(rx.into_iter().count(), 0);
}

#[test]
fn test_cancel_mid_scan_stops_at_next_entry() {
    let env = TestEnv::new();
    for name in ["a.jpg", "b.jpg", "c.jpg", "d.jpg"] {
        env.write_file(name);
    }

    let token = CancellationToken::new();
    let observer = Arc::new(CancelAfter {
        token: token.clone(),
        after: 2,
        seen: AtomicUsize::new(0),
    });
    let scanner = Scanner::new().with_observer(observer);
    let (queue, rx) = queue::unbounded();
    let stats = scanner
        .scan_with_cancel(&job(&env, JobOptions::default()), &queue, &token)
        .unwrap();
    drop(queue);

    assert!(stats.cancelled);
    assert_eq!(stats.tasks_enqueued, 2);
    assert_eq!(rx.into_iter().count(), 2);
}

#[test]
fn test_source_that_is_a_file_fails_fast() {
    let env = TestEnv::new();
    let file = env.write_file("a.jpg");
    let job = Job::new(
        &file,
        JobOptions::default(),
        Arc::new(FakeClient::default()),
        Arc::new(InMemoryTracker::new()),
        Arc::new(InMemorySessionStore::new()),
    )
    .unwrap();

    let (queue, rx) = queue::unbounded();
    let err = Scanner::new().scan(&job, &queue).unwrap_err();
    drop(queue);

    assert!(matches!(err, UploadError::NotADirectory(p) if p == file));
    assert_eq!(rx.into_iter().count(), 0);
}

#[cfg(unix)]
#[test]
fn test_symlinked_folders_are_not_followed() {
    let env = TestEnv::new();
    let outside = env._temp.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    fs::write(outside.join("x.jpg"), b"x").unwrap();
    std::os::unix::fs::symlink(&outside, env.source_dir.join("link")).unwrap();
    env.write_file("a.jpg");

    let (_, tasks, _) = scan_all(&job(&env, JobOptions::default()));
    assert_eq!(rel_paths(&env, &tasks), vec!["a.jpg"]);
}

/// Restores a folder's permissions on drop so the temp dir can be removed.
#[cfg(unix)]
struct PermissionGuard(PathBuf);

#[cfg(unix)]
impl PermissionGuard {
    fn set(path: PathBuf, mode: u32) -> Self {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        Self(path)
    }
}

#[cfg(unix)]
impl Drop for PermissionGuard {
    fn drop(&mut self) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&self.0, fs::Permissions::from_mode(0o755)).ok();
    }
}

#[cfg(unix)]
fn entry_error_paths(events: &[ScanEvent]) -> Vec<PathBuf> {
    events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::EntryError { path, .. } => path.clone(),
            _ => None,
        })
        .collect()
}

#[cfg(unix)]
#[test]
fn test_unreadable_folder_is_skipped_and_siblings_still_enqueued() {
    let env = TestEnv::new();
    env.write_file("a.jpg");
    env.write_file("locked/b.jpg");
    env.write_file("z.jpg");
    let locked = env.source_dir.join("locked");
    let _guard = PermissionGuard::set(locked.clone(), 0o000);
    if fs::read_dir(&locked).is_ok() {
        // Permission bits do not apply to this user (root).
        return;
    }

    let (stats, tasks, events) = scan_all(&job(&env, JobOptions::default()));

    assert_eq!(rel_paths(&env, &tasks), vec!["a.jpg", "z.jpg"]);
    assert_eq!(stats.entry_errors, 1);
    assert_eq!(stats.tasks_enqueued, 2);
    assert_eq!(entry_error_paths(&events), vec![locked]);
    assert!(matches!(events.last(), Some(ScanEvent::Finished { .. })));
}

#[cfg(unix)]
#[test]
fn test_entries_without_metadata_are_counted_and_skipped() {
    let env = TestEnv::new();
    env.write_file("a.jpg");
    env.write_file("sealed/c.jpg");
    env.write_file("sealed/inner/d.jpg");
    env.write_file("z.jpg");
    let sealed = env.source_dir.join("sealed");
    // Listable but not searchable: names are visible, metadata is not.
    let _guard = PermissionGuard::set(sealed.clone(), 0o444);
    if fs::symlink_metadata(sealed.join("c.jpg")).is_ok() {
        return;
    }

    let (stats, tasks, events) = scan_all(&job(&env, JobOptions::default()));

    assert_eq!(rel_paths(&env, &tasks), vec!["a.jpg", "z.jpg"]);
    assert_eq!(stats.entry_errors, 2);
    let mut failed = entry_error_paths(&events);
    failed.sort();
    assert_eq!(failed, vec![sealed.join("c.jpg"), sealed.join("inner")]);
    // The unreadable folder is not descended into.
    assert!(!events.iter().any(|e| matches!(
        e,
        ScanEvent::EntryError { path: Some(p), .. } if p.ends_with("d.jpg")
    )));
}

// ============================================================================
// Persistent tracking and multi-job dispatch
// ============================================================================

#[test]
fn test_rescan_after_marking_uploads_is_empty() {
    let env = TestEnv::new();
    env.write_file("vacation/a.jpg");
    env.write_file("vacation/b.jpg");
    let store = env._temp.path().join("uploads.json");

    let tracker = Arc::new(JsonFileTracker::open(&store).unwrap());
    let first = job_with(
        &env,
        JobOptions::default(),
        Arc::new(FakeClient::default()),
        tracker.clone(),
    );
    let (_, tasks, _) = scan_all(&first);
    assert_eq!(tasks.len(), 2);
    for task in &tasks {
        tracker.mark_uploaded(task.path()).unwrap();
    }

    let reopened = Arc::new(JsonFileTracker::open(&store).unwrap());
    let second = job_with(
        &env,
        JobOptions::default(),
        Arc::new(FakeClient::default()),
        reopened,
    );
    let (stats, tasks, _) = scan_all(&second);
    assert!(tasks.is_empty());
    assert_eq!(stats.already_uploaded, 2);
}

#[test]
fn test_dispatcher_runs_jobs_with_their_own_options() {
    let env_a = TestEnv::new();
    let env_b = TestEnv::new();
    env_a.write_file("trip/a.jpg");
    env_a.write_file("trip/a.mov");
    env_b.write_file("trip/b.jpg");
    env_b.write_file("trip/b.mov");

    let client = Arc::new(FakeClient::default());
    let tracker: Arc<dyn UploadTracker> = Arc::new(InMemoryTracker::new());
    let photos_only = job_with(
        &env_a,
        JobOptions::builder().create_collections(true).build(),
        client.clone(),
        tracker.clone(),
    );
    let with_videos = job_with(
        &env_b,
        JobOptions::builder().include_videos(true).build(),
        client.clone(),
        tracker,
    );

    let dispatcher =
        Dispatcher::new(Scanner::new().with_observer(Arc::new(RecordingObserver::new())));
    let (queue, rx) = queue::bounded(1);
    let consumer = thread::spawn(move || rx.into_iter().collect::<Vec<_>>());
    let outcomes = dispatcher.run(vec![photos_only, with_videos], queue, &CancellationToken::new());
    let tasks = consumer.join().unwrap();

    assert!(outcomes.iter().all(|o| o.is_ok()));
    let mut names: Vec<_> = tasks
        .iter()
        .map(|t| t.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.jpg", "b.jpg", "b.mov"]);

    let a = tasks
        .iter()
        .find(|t| t.path().ends_with("a.jpg"))
        .unwrap();
    assert_eq!(a.collection_id(), "auto-trip");
    assert!(tasks
        .iter()
        .filter(|t| t.path().starts_with(&env_b.source_dir))
        .all(|t| t.collection_id().is_empty()));
}
