//! One-way cancellation shared between the coordinator, its callers and
//! workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The side that may cancel. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag to cancelled. Later calls have no effect.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// A read-only view for workers.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            flag: Arc::clone(&self.flag),
        }
    }
}

/// The side that may only observe cancellation.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_see_cancellation() {
        let handle = CancelHandle::new();
        let token = handle.token();
        assert!(!token.is_cancelled());
        handle.clone().cancel();
        assert!(token.is_cancelled());
        handle.cancel();
        assert!(handle.is_cancelled());
    }
}
