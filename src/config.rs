use std::ops::RangeInclusive;
use std::time::Duration;

use crate::enumerator::combinations;
use crate::{Alphabet, SwallowError, TargetDigest};

/// Upper bound on the worker count accepted from callers.
pub const MAX_WORKERS: usize = 120;
/// Worker count used when none is given.
pub const DEFAULT_WORKERS: usize = 30;

/// What to search for and where.
#[derive(Debug, Clone)]
pub struct SearchSpec {
    pub target: TargetDigest,
    pub alphabet: Alphabet,
    pub min_length: usize,
    pub max_length: usize,
}

impl SearchSpec {
    pub fn new(
        target: TargetDigest,
        alphabet: Alphabet,
        min_length: usize,
        max_length: usize,
    ) -> Result<Self, SwallowError> {
        if min_length < 1 {
            return Err(SwallowError::config("minimum length must be at least 1"));
        }
        if max_length < min_length {
            return Err(SwallowError::config(format!(
                "maximum length {max_length} is below minimum length {min_length}"
            )));
        }
        let spec = Self {
            target,
            alphabet,
            min_length,
            max_length,
        };
        spec.total_combinations()?;
        Ok(spec)
    }

    pub fn lengths(&self) -> RangeInclusive<usize> {
        self.min_length..=self.max_length
    }

    /// Number of candidates across every length in the range.
    pub fn total_combinations(&self) -> Result<u64, SwallowError> {
        let mut total: u64 = 0;
        for len in self.lengths() {
            total = combinations(self.alphabet.len(), len)
                .and_then(|n| total.checked_add(n))
                .ok_or_else(|| {
                    SwallowError::config(format!(
                        "search space of {} symbols up to length {} is too large to count",
                        self.alphabet.len(),
                        self.max_length
                    ))
                })?;
        }
        Ok(total)
    }
}

/// Runtime tuning for a crack run.
#[derive(Debug, Clone)]
pub struct CrackConfig {
    /// Number of worker threads requested.
    pub workers: usize,
    /// Candidates pulled from the enumerator per batch.
    pub batch_size: usize,
    /// Accumulated progress a worker holds before reporting it.
    pub update_threshold: u64,
    /// How long the coordinator waits for progress before re-checking state.
    pub poll_interval: Duration,
    /// How long a worker may keep running after cancellation.
    pub shutdown_grace: Duration,
    /// Extra looks at the result slot after shutdown.
    pub result_drain_retries: u32,
    /// Base delay between result slot looks, doubled each retry.
    pub result_drain_backoff: Duration,
}

impl Default for CrackConfig {
    fn default() -> Self {
        Self::for_workers(DEFAULT_WORKERS)
    }
}

impl CrackConfig {
    /// Tuning derived from the worker count. Batches shrink as workers grow so
    /// that roughly a million candidates are in flight per round.
    /// A zero count is kept so that `validate` rejects it.
    pub fn for_workers(workers: usize) -> Self {
        let share_of = workers.max(1);
        let (batch_size, update_threshold) = if workers == MAX_WORKERS {
            let share = 5_000_000 / share_of;
            (share, share as u64)
        } else {
            (1_000_000 / share_of, 1_000_000)
        };
        Self {
            workers,
            batch_size: batch_size.max(1),
            update_threshold,
            poll_interval: Duration::from_millis(500),
            shutdown_grace: Duration::from_secs(5),
            result_drain_retries: 3,
            result_drain_backoff: Duration::from_millis(10),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_update_threshold(mut self, update_threshold: u64) -> Self {
        self.update_threshold = update_threshold;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_shutdown_grace(mut self, shutdown_grace: Duration) -> Self {
        self.shutdown_grace = shutdown_grace;
        self
    }

    pub fn validate(&self) -> Result<(), SwallowError> {
        if !(1..=MAX_WORKERS).contains(&self.workers) {
            return Err(SwallowError::config(format!(
                "worker count must be between 1 and {MAX_WORKERS}, got {}",
                self.workers
            )));
        }
        if self.batch_size == 0 {
            return Err(SwallowError::config("batch size must be at least 1"));
        }
        if self.update_threshold == 0 {
            return Err(SwallowError::config("update threshold must be at least 1"));
        }
        if self.poll_interval.is_zero() {
            return Err(SwallowError::config("poll interval must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> TargetDigest {
        TargetDigest::parse("900150983cd24fb0d6963f7d28e17f72", 16).unwrap()
    }

    #[test]
    fn default_tuning_for_thirty_workers() {
        let cfg = CrackConfig::default();
        assert_eq!(cfg.workers, 30);
        assert_eq!(cfg.batch_size, 33_333);
        assert_eq!(cfg.update_threshold, 1_000_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn max_workers_use_shared_threshold() {
        let cfg = CrackConfig::for_workers(MAX_WORKERS);
        assert_eq!(cfg.batch_size, 41_666);
        assert_eq!(cfg.update_threshold, 41_666);
    }

    #[test]
    fn worker_bounds_are_enforced() {
        assert!(CrackConfig::default().with_workers(0).validate().is_err());
        assert!(CrackConfig::for_workers(0).validate().is_err());
        assert_eq!(CrackConfig::for_workers(0).workers, 0);
        assert!(CrackConfig::default().with_workers(121).validate().is_err());
        assert!(CrackConfig::default().with_batch_size(0).validate().is_err());
        assert!(CrackConfig::default().with_update_threshold(0).validate().is_err());
    }

    #[test]
    fn length_bounds_are_enforced() {
        let abc = Alphabet::new("abc").unwrap();
        assert!(SearchSpec::new(target(), abc.clone(), 0, 3).is_err());
        assert!(SearchSpec::new(target(), abc.clone(), 4, 3).is_err());
        assert!(SearchSpec::new(target(), abc, 3, 3).is_ok());
    }

    #[test]
    fn totals_sum_every_length() {
        let spec = SearchSpec::new(target(), Alphabet::new("ab").unwrap(), 1, 3).unwrap();
        assert_eq!(spec.total_combinations().unwrap(), 2 + 4 + 8);
    }

    #[test]
    fn oversized_space_is_rejected() {
        let err = SearchSpec::new(target(), Alphabet::printable(), 1, 12).unwrap_err();
        assert!(matches!(err, SwallowError::InvalidConfig(_)));
    }
}
