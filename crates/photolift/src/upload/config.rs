//! Configuration for photolift

use super::error::{Result, UploadError};
use super::job::JobOptions;
use super::patterns::PatternSet;
use super::scan_path::expand_home;
use super::tracking::TrackingFailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration: where state lives and which folders to upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Completed-upload tracking file. `~` expands to the home directory.
    #[serde(default = "default_tracking_path")]
    pub tracking_path: String,

    /// Pending tasks held before scans block (0 = unbounded)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Folders to upload, one scan job each
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

/// One folder to upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub source_folder: String,

    /// Put files in a collection named after their folder
    #[serde(default = "default_true")]
    pub create_collections: bool,

    #[serde(default)]
    pub delete_after_upload: bool,

    #[serde(default)]
    pub include_videos: bool,

    #[serde(default)]
    pub include_patterns: Vec<String>,

    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    #[serde(default)]
    pub on_tracking_error: TrackingFailurePolicy,
}

fn default_tracking_path() -> String {
    "~/.photolift/completed_uploads.json".to_string()
}

fn default_queue_capacity() -> usize {
    64
}

fn default_true() -> bool {
    true
}

/// Default config file location: `$PHOTOLIFT_HOME/config.toml`
pub fn default_config_path() -> PathBuf {
    photolift_logging::photolift_home().join("config.toml")
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tracking_path: default_tracking_path(),
            queue_capacity: default_queue_capacity(),
            jobs: Vec::new(),
        }
    }
}

impl UploadConfig {
    /// Starter config written by `photolift init`.
    pub fn sample() -> Self {
        Self {
            jobs: vec![JobConfig::new("~/Pictures")],
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: UploadConfig =
            toml::from_str(&content).map_err(|e| UploadError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| UploadError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configs that cannot produce a scan.
    pub fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            return Err(UploadError::Config("no jobs configured".to_string()));
        }
        for (i, job) in self.jobs.iter().enumerate() {
            if job.source_folder.trim().is_empty() {
                return Err(UploadError::Config(format!(
                    "job {} has an empty source_folder",
                    i + 1
                )));
            }
            PatternSet::compile(&job.include_patterns)?;
            PatternSet::compile(&job.exclude_patterns)?;
        }
        Ok(())
    }

    pub fn tracking_path(&self) -> PathBuf {
        expand_home(Path::new(&self.tracking_path))
    }
}

impl JobConfig {
    pub fn new(source_folder: impl Into<String>) -> Self {
        Self {
            source_folder: source_folder.into(),
            create_collections: true,
            delete_after_upload: false,
            include_videos: false,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            on_tracking_error: TrackingFailurePolicy::default(),
        }
    }

    /// Source folder with `~` expanded.
    pub fn source_path(&self) -> PathBuf {
        expand_home(Path::new(&self.source_folder))
    }

    pub fn options(&self) -> JobOptions {
        JobOptions::builder()
            .create_collections(self.create_collections)
            .delete_after_upload(self.delete_after_upload)
            .include_videos(self.include_videos)
            .include_patterns(self.include_patterns.iter().cloned())
            .exclude_patterns(self.exclude_patterns.iter().cloned())
            .on_tracking_error(self.on_tracking_error)
            .build()
    }
}
