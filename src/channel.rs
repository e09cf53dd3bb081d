//! Communication between workers and the coordinator.
//!
//! Progress travels over an unbounded MPSC channel so workers never block on
//! reporting. The found candidate goes into a write-once slot whose first
//! publish also cancels the search.

use std::sync::{Arc, OnceLock};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::cancel::{CancelHandle, CancelToken};

/// Message sent from a worker to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Candidates tested since the worker's previous progress message.
    Progress { worker_id: usize, count: u64 },
    /// Worker returned normally, by exhaustion or cancellation.
    Finished { worker_id: usize, tested: u64 },
    /// Worker panicked.
    Failed { worker_id: usize, message: String },
}

/// A candidate whose digest matched the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    pub worker_id: usize,
    pub candidate: String,
}

#[derive(Debug)]
struct SlotInner {
    value: OnceLock<Found>,
    cancel: CancelHandle,
}

/// Write-once holder for the search result.
#[derive(Debug, Clone)]
pub struct ResultSlot {
    inner: Arc<SlotInner>,
}

impl ResultSlot {
    pub fn new(cancel: CancelHandle) -> Self {
        Self {
            inner: Arc::new(SlotInner {
                value: OnceLock::new(),
                cancel,
            }),
        }
    }

    /// Store `candidate` and cancel the search. Returns false if another
    /// result was already published; that earlier result is kept.
    pub fn publish(&self, worker_id: usize, candidate: String) -> bool {
        let stored = self
            .inner
            .value
            .set(Found {
                worker_id,
                candidate,
            })
            .is_ok();
        self.inner.cancel.cancel();
        stored
    }

    pub fn get(&self) -> Option<&Found> {
        self.inner.value.get()
    }
}

/// Endpoints handed to one worker.
pub struct WorkerChannels {
    pub to_coordinator: Sender<WorkerMessage>,
    pub results: ResultSlot,
    pub cancel: CancelToken,
}

/// Endpoints kept by the coordinator.
pub struct CoordinatorChannels {
    pub from_workers: Receiver<WorkerMessage>,
    pub results: ResultSlot,
    pub cancel: CancelHandle,
}

/// Create channels for `num_workers` workers sharing `cancel`.
///
/// The coordinator holds no sender, so `from_workers` disconnects once every
/// worker has dropped its endpoints.
pub fn create_channels(
    num_workers: usize,
    cancel: CancelHandle,
) -> (CoordinatorChannels, Vec<WorkerChannels>) {
    let (worker_tx, coordinator_rx) = unbounded();
    let results = ResultSlot::new(cancel.clone());

    let workers = (0..num_workers)
        .map(|_| WorkerChannels {
            to_coordinator: worker_tx.clone(),
            results: results.clone(),
            cancel: cancel.token(),
        })
        .collect();

    let coordinator = CoordinatorChannels {
        from_workers: coordinator_rx,
        results,
        cancel,
    };

    (coordinator, workers)
}
