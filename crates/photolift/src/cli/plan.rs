//! Plan command - run every configured scan and list the uploads it would queue
//!
//! Scans use the real tracking store but a planning client: collections are
//! not created remotely, they get `planned:<name>` ids instead.

use crate::cli::error::HelpfulError;
use anyhow::anyhow;
use photolift::upload::config::{default_config_path, UploadConfig};
use photolift::upload::{
    queue, scan_path, CancellationToken, Collection, Dispatcher, InMemorySessionStore, Job,
    JobOutcome, JsonFileTracker, RemoteClient, ScanStats, Scanner, UploadError, UploadTask,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

#[derive(Debug)]
pub struct PlanArgs {
    pub config: Option<PathBuf>,
    pub json: bool,
}

/// Remote client that never touches the network.
#[derive(Debug, Default)]
pub struct PlanningClient;

impl RemoteClient for PlanningClient {
    fn get_or_create_collection_by_name(&self, name: &str) -> photolift::upload::Result<Collection> {
        Ok(Collection {
            id: format!("planned:{name}"),
            title: name.to_string(),
        })
    }

    fn upload_file(&self, path: &Path, _collection_id: Option<&str>) -> photolift::upload::Result<String> {
        Err(UploadError::Remote(format!(
            "planning client cannot upload {}",
            path.display()
        )))
    }
}

#[derive(Debug, Serialize)]
struct PlannedUpload {
    path: PathBuf,
    collection_id: String,
    delete_after_upload: bool,
}

impl From<UploadTask> for PlannedUpload {
    fn from(task: UploadTask) -> Self {
        Self {
            path: task.path().to_path_buf(),
            collection_id: task.collection_id().to_string(),
            delete_after_upload: task.delete_on_success(),
        }
    }
}

#[derive(Debug, Serialize)]
struct JobReport {
    source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<ScanStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<JobOutcome> for JobReport {
    fn from(outcome: JobOutcome) -> Self {
        let (stats, error) = match outcome.result {
            Ok(stats) => (Some(stats), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            source: outcome.source,
            stats,
            error,
        }
    }
}

#[derive(Debug, Serialize)]
struct PlanReport {
    uploads: Vec<PlannedUpload>,
    jobs: Vec<JobReport>,
}

pub fn run(args: PlanArgs) -> anyhow::Result<()> {
    let report = build_plan(&args.config.unwrap_or_else(default_config_path))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn build_plan(config_path: &Path) -> anyhow::Result<PlanReport> {
    if !config_path.exists() {
        return Err(HelpfulError::config_not_found(config_path).into());
    }
    let config = UploadConfig::load(config_path)
        .and_then(|config| config.validate().map(|()| config))
        .map_err(|e| HelpfulError::invalid_config(config_path, &e.to_string()))?;

    let tracking_path = config.tracking_path();
    let tracker = Arc::new(
        JsonFileTracker::open(&tracking_path)
            .map_err(|e| HelpfulError::tracking_store_error(&tracking_path, &e.to_string()))?,
    );
    let client: Arc<dyn RemoteClient> = Arc::new(PlanningClient);
    let sessions = Arc::new(InMemorySessionStore::new());

    let mut jobs = Vec::with_capacity(config.jobs.len());
    for job_config in &config.jobs {
        let requested = job_config.source_path();
        let source = scan_path::resolve_source_folder(&requested)
            .map_err(|e| HelpfulError::source_folder_invalid(&requested, &e.to_string()))?;
        jobs.push(Job::new(
            source,
            job_config.options(),
            Arc::clone(&client),
            tracker.clone(),
            sessions.clone(),
        )?);
    }

    let (queue, rx) = if config.queue_capacity == 0 {
        queue::unbounded()
    } else {
        queue::bounded(config.queue_capacity)
    };
    let consumer = thread::spawn(move || rx.into_iter().map(PlannedUpload::from).collect::<Vec<_>>());

    let outcomes = Dispatcher::new(Scanner::new()).run(jobs, queue, &CancellationToken::new());
    let uploads = consumer
        .join()
        .map_err(|_| anyhow!("plan consumer thread panicked"))?;

    Ok(PlanReport {
        uploads,
        jobs: outcomes.into_iter().map(JobReport::from).collect(),
    })
}

fn print_report(report: &PlanReport) {
    if report.uploads.is_empty() {
        println!("Nothing to upload.");
    } else {
        println!("Would upload {} file(s):", report.uploads.len());
        for upload in &report.uploads {
            let collection = if upload.collection_id.is_empty() {
                "-"
            } else {
                upload.collection_id.as_str()
            };
            let delete = if upload.delete_after_upload { "  (delete after)" } else { "" };
            println!("  {}  [{}]{}", upload.path.display(), collection, delete);
        }
    }

    println!();
    for job in &report.jobs {
        match (&job.stats, &job.error) {
            (Some(stats), _) => println!(
                "{}: {} queued, {} already uploaded, {} filtered, {} folders skipped",
                job.source.display(),
                stats.tasks_enqueued,
                stats.already_uploaded,
                stats.files_filtered,
                stats.dirs_pruned
            ),
            (None, Some(error)) => println!("{}: FAILED: {}", job.source.display(), error),
            (None, None) => println!("{}: no result", job.source.display()),
        }
    }
}
