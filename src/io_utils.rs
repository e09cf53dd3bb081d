use std::fmt;

use crate::SwallowError;

#[derive(Debug)]
pub struct CliError {
    pub msg: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.msg.fmt(f)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Simple CLI error from string.
pub fn simple_cli_error(msg: &str) -> CliError {
    CliError {
        msg: msg.to_string(),
        source: None,
    }
}

/// Convert a library error into a CLI error with a hint.
pub fn swallow_cli_error(context: &str, err: SwallowError) -> CliError {
    CliError {
        msg: format!("{}: {}", context, cli_hint(&err)),
        source: Some(Box::new(err)),
    }
}

/// Return an actionable hint for a library error variant.
pub fn cli_hint(err: &SwallowError) -> String {
    use SwallowError::*;
    match err {
        InvalidConfig(msg) => format!("{msg}. Check the command line arguments."),
        WorkerFailure { worker_id, message } => {
            format!("worker {worker_id} crashed ({message}). Results are incomplete, rerun the search.")
        }
        WorkerUnresponsive { worker_id, grace } => format!(
            "worker {worker_id} ignored cancellation for {grace:?}. Try a smaller --batch-size."
        ),
        Internal(msg) => format!("{msg}. This is a bug."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn hint_keeps_source() {
        let err = swallow_cli_error("search failed", SwallowError::InvalidConfig("bad alphabet".into()));
        assert_eq!(
            err.to_string(),
            "search failed: bad alphabet. Check the command line arguments."
        );
        assert!(err.source().is_some());
    }
}
