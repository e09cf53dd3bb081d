//! Progress snapshots and the observers that render them.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::report::CrackReport;

/// Progress at one coordinator tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    pub completed: u64,
    pub total: u64,
    pub elapsed: Duration,
    /// `None` until at least one candidate has been reported.
    pub estimated_remaining: Option<Duration>,
}

impl ProgressReport {
    pub fn new(completed: u64, total: u64, elapsed: Duration) -> Self {
        Self {
            completed,
            total,
            elapsed,
            estimated_remaining: estimate_remaining(completed, total, elapsed),
        }
    }

    /// Completed share in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed.min(self.total) as f64 / self.total as f64
    }
}

/// Linear extrapolation of the remaining time from the rate so far.
pub fn estimate_remaining(completed: u64, total: u64, elapsed: Duration) -> Option<Duration> {
    if completed == 0 {
        return None;
    }
    let left = total.saturating_sub(completed) as f64;
    Some(Duration::from_secs_f64(
        elapsed.as_secs_f64() * left / completed as f64,
    ))
}

/// Whole seconds as `H:MM:SS`.
pub fn format_hms(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Receives progress from the coordinator thread.
pub trait ProgressObserver: Send {
    fn on_start(&self, _total: u64) {}
    fn on_progress(&self, report: &ProgressReport);
    fn on_finish(&self, _report: &CrackReport) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _report: &ProgressReport) {}
}

/// Terminal progress bar.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(default_progress_style());
        bar.set_prefix("Cracking Progress");
        Self { bar }
    }
}

impl Default for ProgressBarObserver {
    fn default() -> Self {
        Self::new()
    }
}

pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{prefix} {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}) {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-")
}

impl ProgressObserver for ProgressBarObserver {
    fn on_start(&self, total: u64) {
        self.bar.set_length(total);
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn on_progress(&self, report: &ProgressReport) {
        self.bar.set_position(report.completed);
        if let Some(remaining) = report.estimated_remaining {
            self.bar.set_message(format!(
                "Elapsed {} Remaining {}",
                format_hms(report.elapsed),
                format_hms(remaining)
            ));
        }
    }

    fn on_finish(&self, report: &CrackReport) {
        self.bar.set_position(report.completed);
        self.bar.finish_and_clear();
    }
}
