//! Final outcome of a crack run.

use std::time::Duration;

use serde::Serialize;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "candidate", rename_all = "snake_case")]
pub enum Outcome {
    /// A candidate whose digest equals the target.
    Found(String),
    /// Every candidate in the space was tested without a match.
    NotFound,
    /// Cancelled from outside before a match or exhaustion.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrackReport {
    pub outcome: Outcome,
    /// Candidates reported as tested by workers.
    pub completed: u64,
    /// Size of the whole search space.
    pub total: u64,
    pub elapsed: Duration,
    /// Workers that received a non-empty length range.
    pub workers_started: usize,
}

impl CrackReport {
    pub fn found(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Found(candidate) => Some(candidate),
            _ => None,
        }
    }

    pub fn hashes_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.completed as f64 / secs
        }
    }

    /// Human readable summary on stderr.
    pub fn print_summary(&self) {
        let secs = self.elapsed.as_secs_f64();
        match &self.outcome {
            Outcome::Found(candidate) => {
                eprintln!("Password found: {candidate}");
                eprintln!("Cracking completed successfully in {secs:.2} seconds.");
            }
            Outcome::NotFound => {
                eprintln!("Password not found within the given range. Took {secs:.2} seconds.");
            }
            Outcome::Interrupted => {
                eprintln!("Cracking interrupted by user. Took {secs:.2} seconds.");
            }
        }
        eprintln!(
            "Tested {} of {} combinations ({:.0} hashes/s)",
            self.completed,
            self.total,
            self.hashes_per_sec()
        );
    }
}
