//! Search workers: each one enumerates its own lengths and tests candidates.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use log::{debug, error};

use crate::channel::{WorkerChannels, WorkerMessage};
use crate::digest::Digester;
use crate::enumerator::{combinations, Enumerator};
use crate::partition::LengthRange;
use crate::{SwallowError, TargetDigest};

/// Read-only search parameters shared by all workers.
pub struct SearchContext {
    pub symbols: Arc<[char]>,
    pub target: TargetDigest,
    pub digester: Arc<dyn Digester>,
}

/// One worker's share of the search.
#[derive(Debug, Clone, Copy)]
pub struct WorkerTask {
    pub worker_id: usize,
    pub lengths: LengthRange,
    pub batch_size: usize,
    pub update_threshold: u64,
}

/// Why a worker returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// Every candidate in the range was tested.
    Exhausted,
    /// Cancellation was observed at a batch or length boundary.
    Cancelled,
    /// This worker published the result.
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    pub exit: WorkerExit,
    /// Candidates reported to the coordinator.
    pub tested: u64,
}

/// Batches progress into messages of at least `threshold` candidates.
struct ProgressAccumulator<'a> {
    worker_id: usize,
    threshold: u64,
    pending: u64,
    reported: u64,
    sink: &'a Sender<WorkerMessage>,
}

impl<'a> ProgressAccumulator<'a> {
    fn new(worker_id: usize, threshold: u64, sink: &'a Sender<WorkerMessage>) -> Self {
        Self {
            worker_id,
            threshold,
            pending: 0,
            reported: 0,
            sink,
        }
    }

    fn add(&mut self, count: u64) {
        self.pending += count;
        if self.pending >= self.threshold {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.pending == 0 {
            return;
        }
        // a closed channel means the coordinator is gone; nothing to report to
        let _ = self.sink.send(WorkerMessage::Progress {
            worker_id: self.worker_id,
            count: self.pending,
        });
        self.reported += self.pending;
        self.pending = 0;
    }
}

impl WorkerTask {
    /// Test every candidate of every assigned length until a match, exhaustion
    /// or cancellation.
    ///
    /// Cancellation is checked before each length and each batch, never inside
    /// a batch. On a match the candidates tested in the matching batch, up to
    /// and including the match, are counted before returning.
    pub fn run(&self, ctx: &SearchContext, channels: &WorkerChannels) -> WorkerSummary {
        let mut progress =
            ProgressAccumulator::new(self.worker_id, self.update_threshold, &channels.to_coordinator);
        // no batch can hold more than the longest length's candidates
        let largest = self
            .lengths
            .iter()
            .last()
            .and_then(|length| combinations(ctx.symbols.len(), length))
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(usize::MAX);
        let mut batch = Vec::with_capacity(self.batch_size.min(largest));
        let target = ctx.target.as_bytes();

        for length in self.lengths {
            let mut candidates = Enumerator::new(Arc::clone(&ctx.symbols), length);
            loop {
                if channels.cancel.is_cancelled() {
                    progress.flush();
                    return WorkerSummary {
                        exit: WorkerExit::Cancelled,
                        tested: progress.reported,
                    };
                }
                if candidates.next_batch(self.batch_size, &mut batch) == 0 {
                    break;
                }

                let hit = batch
                    .iter()
                    .position(|c| ctx.digester.matches(c.as_bytes(), target));
                if let Some(pos) = hit {
                    let candidate = std::mem::take(&mut batch[pos]);
                    debug!("worker {} matched at length {length}", self.worker_id);
                    channels.results.publish(self.worker_id, candidate);
                    progress.add(pos as u64 + 1);
                    progress.flush();
                    return WorkerSummary {
                        exit: WorkerExit::Matched,
                        tested: progress.reported,
                    };
                }
                progress.add(batch.len() as u64);
            }
            progress.flush();
        }

        WorkerSummary {
            exit: WorkerExit::Exhausted,
            tested: progress.reported,
        }
    }
}

/// Start `task` on its own thread.
///
/// The thread always ends with exactly one `Finished` or `Failed` message, so
/// the coordinator learns about panics instead of waiting on a silent worker.
pub fn spawn_worker(
    task: WorkerTask,
    ctx: Arc<SearchContext>,
    channels: WorkerChannels,
) -> Result<JoinHandle<()>, SwallowError> {
    thread::Builder::new()
        .name(format!("swallow-worker-{}", task.worker_id))
        .spawn(move || {
            debug!(
                "worker {} starting on lengths {:?}",
                task.worker_id,
                task.lengths.iter()
            );
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| task.run(&ctx, &channels)));
            let message = match outcome {
                Ok(summary) => {
                    debug!(
                        "worker {} stopped ({:?}) after {} candidates",
                        task.worker_id, summary.exit, summary.tested
                    );
                    WorkerMessage::Finished {
                        worker_id: task.worker_id,
                        tested: summary.tested,
                    }
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!("worker {} panicked: {message}", task.worker_id);
                    WorkerMessage::Failed {
                        worker_id: task.worker_id,
                        message,
                    }
                }
            };
            let _ = channels.to_coordinator.send(message);
        })
        .map_err(|e| SwallowError::Internal(format!("failed to spawn worker {}: {e}", task.worker_id)))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
