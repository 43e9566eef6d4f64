//! Jobs: one scan of one source folder.

use super::error::Result;
use super::filter::Filter;
use super::remote::RemoteClient;
use super::session::UploadSessionStore;
use super::task::TaskBuilder;
use super::tracking::{TrackingFailurePolicy, UploadTracker};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Immutable per-job settings. Safe to share across concurrent scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOptions {
    create_collections: bool,
    delete_after_upload: bool,
    include_videos: bool,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
    on_tracking_error: TrackingFailurePolicy,
}

impl JobOptions {
    pub fn builder() -> JobOptionsBuilder {
        JobOptionsBuilder::default()
    }

    pub fn create_collections(&self) -> bool {
        self.create_collections
    }

    pub fn delete_after_upload(&self) -> bool {
        self.delete_after_upload
    }

    pub fn include_videos(&self) -> bool {
        self.include_videos
    }

    pub fn include_patterns(&self) -> &[String] {
        &self.include_patterns
    }

    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    pub fn on_tracking_error(&self) -> TrackingFailurePolicy {
        self.on_tracking_error
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobOptionsBuilder {
    options: JobOptions,
}

impl JobOptionsBuilder {
    pub fn create_collections(mut self, yes: bool) -> Self {
        self.options.create_collections = yes;
        self
    }

    pub fn delete_after_upload(mut self, yes: bool) -> Self {
        self.options.delete_after_upload = yes;
        self
    }

    pub fn include_videos(mut self, yes: bool) -> Self {
        self.options.include_videos = yes;
        self
    }

    pub fn include_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.include_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.exclude_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_tracking_error(mut self, policy: TrackingFailurePolicy) -> Self {
        self.options.on_tracking_error = policy;
        self
    }

    pub fn build(self) -> JobOptions {
        self.options
    }
}

/// A source folder plus everything needed to scan it.
///
/// Collaborators are shared handles; the job owns none of their state and
/// holds no background resources.
pub struct Job {
    source: PathBuf,
    options: JobOptions,
    filter: Filter,
    client: Arc<dyn RemoteClient>,
    tracker: Arc<dyn UploadTracker>,
    sessions: Arc<dyn UploadSessionStore>,
}

impl Job {
    /// Build a job, compiling its filter. Fails on an invalid pattern.
    ///
    /// A relative `source` is resolved against the current directory here,
    /// so every task path the job produces is absolute.
    pub fn new(
        source: impl Into<PathBuf>,
        options: JobOptions,
        client: Arc<dyn RemoteClient>,
        tracker: Arc<dyn UploadTracker>,
        sessions: Arc<dyn UploadSessionStore>,
    ) -> Result<Self> {
        let filter = Filter::new(
            &options.include_patterns,
            &options.exclude_patterns,
            options.include_videos,
        )?;
        Ok(Self {
            source: absolute_source(source.into())?,
            options,
            filter,
            client,
            tracker,
            sessions,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn options(&self) -> &JobOptions {
        &self.options
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn client(&self) -> &Arc<dyn RemoteClient> {
        &self.client
    }

    pub fn tracker(&self) -> &Arc<dyn UploadTracker> {
        &self.tracker
    }

    /// Resumable-session store for consumers of this job's tasks.
    pub fn sessions(&self) -> &Arc<dyn UploadSessionStore> {
        &self.sessions
    }

    pub(crate) fn task_builder(&self) -> TaskBuilder {
        TaskBuilder::new(Arc::clone(&self.client), self.options.delete_after_upload)
    }
}

fn absolute_source(source: PathBuf) -> Result<PathBuf> {
    if source.is_absolute() {
        return Ok(source);
    }
    Ok(std::env::current_dir()?.join(source))
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("source", &self.source)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
