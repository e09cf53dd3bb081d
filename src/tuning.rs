//! Resource-aware adjustments applied to a [`CrackConfig`] before a run.
//!
//! Clamping only resizes workers and batches. It never narrows the search
//! space.

use std::mem::size_of;

use log::warn;
use sysinfo::{System, SystemExt};

use crate::{CrackConfig, SearchSpec};

/// Threads per logical CPU worth running.
pub const WORKERS_PER_CPU: usize = 2;

/// Cap `requested` at [`WORKERS_PER_CPU`] times `cpus`.
pub fn clamp_workers(requested: usize, cpus: usize) -> usize {
    let limit = (cpus * WORKERS_PER_CPU).max(1);
    if requested > limit {
        warn!("{requested} workers requested but only {cpus} CPUs available, using {limit}");
        limit
    } else {
        requested
    }
}

/// Rough heap footprint of one buffered candidate of `max_length` symbols.
pub fn candidate_footprint(max_length: usize) -> u64 {
    (size_of::<String>() + max_length * 4) as u64
}

/// Cap the batch size so every worker's batch together stays within half of
/// `available_bytes`.
pub fn clamp_batch_size(batch_size: usize, workers: usize, max_length: usize, available_bytes: u64) -> usize {
    let budget = available_bytes / 2;
    let per_batch = budget / (workers.max(1) as u64 * candidate_footprint(max_length));
    let limit = usize::try_from(per_batch).unwrap_or(usize::MAX).max(1);
    if batch_size > limit {
        warn!(
            "batch size {batch_size} exceeds the memory budget of {} MiB, using {limit}",
            budget / (1024 * 1024)
        );
        limit
    } else {
        batch_size
    }
}

/// Available memory in bytes as reported by the OS.
pub fn available_memory() -> u64 {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.available_memory()
}

/// Apply both clamps using the host's CPU count and free memory.
pub fn fit_to_host(config: CrackConfig, spec: &SearchSpec) -> CrackConfig {
    let workers = clamp_workers(config.workers, num_cpus::get());
    let available = available_memory();
    let batch_size = if available == 0 {
        // memory stats unavailable on this platform
        config.batch_size
    } else {
        clamp_batch_size(config.batch_size, workers, spec.max_length, available)
    };
    config.with_workers(workers).with_batch_size(batch_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workers_capped_at_twice_cpus() {
        assert_eq!(clamp_workers(30, 4), 8);
        assert_eq!(clamp_workers(6, 4), 6);
        assert_eq!(clamp_workers(3, 0), 1);
    }

    #[test]
    fn batch_shrinks_under_memory_pressure() {
        let footprint = candidate_footprint(8);
        // room for exactly 100 candidates per worker across 4 workers
        let available = 2 * 4 * 100 * footprint;
        assert_eq!(clamp_batch_size(1_000, 4, 8, available), 100);
        assert_eq!(clamp_batch_size(50, 4, 8, available), 50);
    }

    #[test]
    fn batch_never_drops_to_zero() {
        assert_eq!(clamp_batch_size(1_000, 120, 64, 1), 1);
    }
}
