use crate::config::HarvestConfig;
use crate::error::BrowserError;
use std::time::Duration;

/// How a failure is handled by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The handle was invalidated by a re-render; retry in place
    Stale,
    /// The element is absent; never retried
    Missing,
    /// The session is gone; stop the run
    Fatal,
    /// Anything else; retried where retries apply, otherwise skipped
    Other,
}

/// Bounds retries and decides what is recoverable
#[derive(Debug, Clone)]
pub struct ErrorRecoveryPolicy {
    max_attempts: usize,
    backoff: Duration,
}

impl ErrorRecoveryPolicy {
    pub fn new(max_attempts: usize, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &HarvestConfig) -> Self {
        Self::new(config.limits.select_attempts, config.timing.retry_backoff())
    }

    pub fn classify(&self, error: &BrowserError) -> Failure {
        match error {
            BrowserError::Stale(_) => Failure::Stale,
            BrowserError::NotFound(_) | BrowserError::Timeout { .. } => Failure::Missing,
            BrowserError::SessionLost(_) => Failure::Fatal,
            BrowserError::Script(_) | BrowserError::Command(_) => Failure::Other,
        }
    }

    /// Whether another attempt should follow a failed `attempt` (1-based)
    pub fn should_retry(&self, failure: Failure, attempt: usize) -> bool {
        match failure {
            Failure::Stale | Failure::Other => attempt < self.max_attempts,
            Failure::Missing | Failure::Fatal => false,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }
}
