//! Outbound task queue.
//!
//! Producers (scanners) hold [`UploadQueue`] handles; the consumer holds the
//! receiving end. `publish` on a bounded queue blocks while it is full, which
//! ties scan speed to upload throughput. Scanners never close the queue: it
//! closes when the orchestrator drops the last handle.

use super::error::{Result, UploadError};
use super::task::UploadTask;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};

/// Producer handle. Cheap to clone; one per concurrent scan.
#[derive(Debug, Clone)]
pub enum UploadQueue {
    Bounded(SyncSender<UploadTask>),
    Unbounded(Sender<UploadTask>),
}

/// Queue that holds at most `capacity` pending tasks.
///
/// A capacity of 0 is a rendezvous queue: each publish waits for a receive.
pub fn bounded(capacity: usize) -> (UploadQueue, Receiver<UploadTask>) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    (UploadQueue::Bounded(tx), rx)
}

/// Queue without backpressure.
pub fn unbounded() -> (UploadQueue, Receiver<UploadTask>) {
    let (tx, rx) = mpsc::channel();
    (UploadQueue::Unbounded(tx), rx)
}

impl UploadQueue {
    /// Hand a task to the consumer, blocking while a bounded queue is full.
    ///
    /// Fails with [`UploadError::QueueClosed`] once the receiver is dropped.
    pub fn publish(&self, task: UploadTask) -> Result<()> {
        let sent = match self {
            Self::Bounded(tx) => tx.send(task).is_ok(),
            Self::Unbounded(tx) => tx.send(task).is_ok(),
        };
        if sent {
            Ok(())
        } else {
            Err(UploadError::QueueClosed)
        }
    }
}
