use super::error::EngineError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared cancellation flag with an optional wall-clock deadline.
///
/// Clones observe the same flag, so one clone can be handed to a signal
/// handler while the solver polls another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().and_timeout(timeout)
    }

    /// Adds a deadline `timeout` from now. A timeout too large to represent
    /// as an `Instant` leaves the token without a deadline.
    pub fn and_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.and_deadline(deadline),
            None => self,
        }
    }

    /// Adds (or tightens) a deadline on this token and its future clones.
    pub fn and_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst) || self.is_expired()
    }

    fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Returns `Cancelled` once the flag is set or the deadline has passed.
    pub fn check(&self) -> Result<(), EngineError> {
        if self.flag.load(Ordering::SeqCst) {
            return Err(EngineError::Cancelled {
                reason: "cancellation requested".to_string(),
            });
        }
        if self.is_expired() {
            return Err(EngineError::Cancelled {
                reason: "timeout reached".to_string(),
            });
        }
        Ok(())
    }
}
