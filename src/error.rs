use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwallowError {
    /// Rejected search input or tuning parameter. Raised before any worker starts.
    #[error("config error: {0}")]
    InvalidConfig(String),

    /// A worker panicked while testing candidates.
    #[error("worker {worker_id} failed: {message}")]
    WorkerFailure { worker_id: usize, message: String },

    /// A worker kept running after cancellation for longer than the grace period.
    #[error("worker {worker_id} did not stop within {grace:?} of cancellation")]
    WorkerUnresponsive { worker_id: usize, grace: Duration },

    /// Catch all for unexpected internal problems.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwallowError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SwallowError::InvalidConfig(msg.into())
    }
}
