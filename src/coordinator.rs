//! Parallel search coordinator that manages worker threads.
//!
//! A run moves through `Running`, then one of the stop causes (result found,
//! space exhausted, cancelled from outside, worker failed), then shutdown:
//! cancellation is set, workers get a bounded grace period to exit, and the
//! result slot is checked a few more times before a run is declared fruitless.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use log::{debug, error, info, warn};

use crate::cancel::CancelHandle;
use crate::channel::{create_channels, CoordinatorChannels, WorkerMessage};
use crate::digest::{Digester, HashAlgorithm};
use crate::partition::{Partitioner, StaticPartitioner};
use crate::progress::{NoProgress, ProgressObserver, ProgressReport};
use crate::report::{CrackReport, Outcome};
use crate::worker::{spawn_worker, SearchContext, WorkerTask};
use crate::{CrackConfig, SearchSpec, SwallowError};

const SHUTDOWN_POLL: Duration = Duration::from_millis(5);

/// Why the coordinator left its main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopCause {
    ResultFound,
    SpaceExhausted,
    CancelledExternally,
    WorkerFailed,
}

/// Running totals fed by worker messages.
#[derive(Debug, Default)]
struct Tally {
    completed: u64,
    finished: usize,
    failure: Option<SwallowError>,
}

impl Tally {
    fn apply(&mut self, msg: WorkerMessage, cancel: &CancelHandle) {
        match msg {
            WorkerMessage::Progress { count, .. } => self.completed += count,
            WorkerMessage::Finished { worker_id, tested } => {
                debug!("worker {worker_id} finished after {tested} candidates");
                self.finished += 1;
            }
            WorkerMessage::Failed { worker_id, message } => {
                self.finished += 1;
                cancel.cancel();
                if self.failure.is_none() {
                    self.failure = Some(SwallowError::WorkerFailure { worker_id, message });
                }
            }
        }
    }

    fn drain(&mut self, channels: &CoordinatorChannels) {
        while let Ok(msg) = channels.from_workers.try_recv() {
            self.apply(msg, &channels.cancel);
        }
    }
}

/// Runs one search over a [`SearchSpec`].
pub struct Coordinator {
    spec: SearchSpec,
    config: CrackConfig,
    digester: Arc<dyn Digester>,
    partitioner: Box<dyn Partitioner>,
    observer: Box<dyn ProgressObserver>,
    cancel: CancelHandle,
}

impl Coordinator {
    /// MD5 search with the static partitioner and no progress output.
    pub fn new(spec: SearchSpec, config: CrackConfig) -> Self {
        Self {
            spec,
            config,
            digester: Arc::new(HashAlgorithm::Md5),
            partitioner: Box::new(StaticPartitioner),
            observer: Box::new(NoProgress),
            cancel: CancelHandle::new(),
        }
    }

    pub fn with_algorithm(self, algorithm: HashAlgorithm) -> Self {
        self.with_digester(Arc::new(algorithm))
    }

    pub fn with_digester(mut self, digester: Arc<dyn Digester>) -> Self {
        self.digester = digester;
        self
    }

    pub fn with_partitioner(mut self, partitioner: impl Partitioner + 'static) -> Self {
        self.partitioner = Box::new(partitioner);
        self
    }

    pub fn with_observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Handle for cancelling the run from another thread, e.g. on Ctrl-C.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run the search to completion.
    ///
    /// Configuration problems are reported before any worker starts. A
    /// published result always wins, even over a worker failure that raced
    /// with it.
    pub fn crack(self) -> Result<CrackReport, SwallowError> {
        self.config.validate()?;
        if self.spec.target.as_bytes().len() != self.digester.output_len() {
            return Err(SwallowError::InvalidConfig(format!(
                "target digest is {} bytes but the hash produces {}",
                self.spec.target.as_bytes().len(),
                self.digester.output_len()
            )));
        }
        let total = self.spec.total_combinations()?;
        let ranges = self.partitioner.partition(
            self.spec.min_length,
            self.spec.max_length,
            self.config.workers,
        );

        let start = Instant::now();
        let ctx = Arc::new(SearchContext {
            symbols: self.spec.alphabet.symbols().into(),
            target: self.spec.target.clone(),
            digester: Arc::clone(&self.digester),
        });
        let (channels, worker_channels) = create_channels(ranges.len(), self.cancel.clone());

        info!(
            "searching {} combinations of lengths {}..={} with {} workers",
            total, self.spec.min_length, self.spec.max_length, self.config.workers
        );

        let mut handles: Vec<(usize, JoinHandle<()>)> = Vec::with_capacity(ranges.len());
        for ((worker_id, lengths), endpoints) in ranges.into_iter().enumerate().zip(worker_channels) {
            if lengths.is_empty() {
                debug!("worker {worker_id} has no lengths, not starting");
                continue;
            }
            let task = WorkerTask {
                worker_id,
                lengths,
                batch_size: self.config.batch_size,
                update_threshold: self.config.update_threshold,
            };
            match spawn_worker(task, Arc::clone(&ctx), endpoints) {
                Ok(handle) => handles.push((worker_id, handle)),
                Err(e) => {
                    self.cancel.cancel();
                    self.shutdown(handles);
                    return Err(e);
                }
            }
        }
        let workers_started = handles.len();

        self.observer.on_start(total);
        let mut tally = Tally::default();
        let cause = self.run_loop(&channels, &mut tally, total, workers_started, start);
        debug!("coordinator stopping: {cause:?}");

        self.cancel.cancel();
        let stalled = self.shutdown(handles);
        tally.drain(&channels);
        let found = self.drain_result(&channels);

        let elapsed = start.elapsed();
        let outcome = match (found, tally.failure.take(), stalled.first()) {
            (Some(candidate), failure, _) => {
                if let Some(e) = failure {
                    warn!("ignoring {e} because a result was already found");
                }
                Outcome::Found(candidate)
            }
            (None, Some(e), _) => return Err(e),
            (None, None, Some(&worker_id)) => {
                return Err(SwallowError::WorkerUnresponsive {
                    worker_id,
                    grace: self.config.shutdown_grace,
                })
            }
            (None, None, None) if cause == StopCause::CancelledExternally => Outcome::Interrupted,
            (None, None, None) => {
                if tally.completed != total {
                    return Err(SwallowError::Internal(format!(
                        "workers finished after reporting {} of {} combinations",
                        tally.completed, total
                    )));
                }
                Outcome::NotFound
            }
        };

        let report = CrackReport {
            outcome,
            completed: tally.completed,
            total,
            elapsed,
            workers_started,
        };
        info!(
            "search ended: {:?} after {} of {} combinations in {:.2?}",
            report.outcome, report.completed, report.total, report.elapsed
        );
        self.observer.on_finish(&report);
        Ok(report)
    }

    fn run_loop(
        &self,
        channels: &CoordinatorChannels,
        tally: &mut Tally,
        total: u64,
        live_workers: usize,
        start: Instant,
    ) -> StopCause {
        loop {
            // a result outranks everything, including pending progress
            if channels.results.get().is_some() {
                return StopCause::ResultFound;
            }
            if tally.failure.is_some() {
                return StopCause::WorkerFailed;
            }
            if channels.cancel.is_cancelled() {
                return StopCause::CancelledExternally;
            }
            if tally.completed >= total || tally.finished >= live_workers {
                return StopCause::SpaceExhausted;
            }

            match channels.from_workers.recv_timeout(self.config.poll_interval) {
                Ok(msg) => {
                    tally.apply(msg, &channels.cancel);
                    tally.drain(channels);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    if tally.finished < live_workers && tally.failure.is_none() {
                        error!(
                            "{} workers exited without reporting",
                            live_workers - tally.finished
                        );
                        tally.failure = Some(SwallowError::Internal(
                            "workers exited without reporting".to_string(),
                        ));
                    }
                }
            }

            self.observer
                .on_progress(&ProgressReport::new(tally.completed, total, start.elapsed()));
        }
    }

    /// Wait for workers to exit, sharing one grace period between them.
    /// Returns the ids of workers still running when it expired; their
    /// threads are detached.
    fn shutdown(&self, handles: Vec<(usize, JoinHandle<()>)>) -> Vec<usize> {
        let deadline = Instant::now() + self.config.shutdown_grace;
        let mut stalled = Vec::new();
        for (worker_id, handle) in handles {
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(SHUTDOWN_POLL);
            }
            if handle.is_finished() {
                if handle.join().is_err() {
                    warn!("worker {worker_id} thread ended abnormally");
                }
            } else {
                warn!(
                    "worker {worker_id} still running {:?} after cancellation, detaching",
                    self.config.shutdown_grace
                );
                stalled.push(worker_id);
            }
        }
        stalled
    }

    /// Look at the result slot a few times with doubling backoff.
    fn drain_result(&self, channels: &CoordinatorChannels) -> Option<String> {
        let mut backoff = self.config.result_drain_backoff;
        for attempt in 0..=self.config.result_drain_retries {
            if let Some(found) = channels.results.get() {
                debug!("result from worker {} seen on attempt {attempt}", found.worker_id);
                return Some(found.candidate.clone());
            }
            if attempt < self.config.result_drain_retries {
                thread::sleep(backoff);
                backoff *= 2;
            }
        }
        None
    }
}

/// MD5 search with default partitioning and no progress output.
pub fn crack(spec: SearchSpec, config: CrackConfig) -> Result<CrackReport, SwallowError> {
    Coordinator::new(spec, config).crack()
}
