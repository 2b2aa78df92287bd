use std::time::Duration;
use thiserror::Error;

/// Failures reported by the browser capability layer.
///
/// The variants mirror what the engine needs to tell apart: a handle that
/// went stale under a re-render, an element that simply is not there, a
/// bounded wait that ran out, and a session that is gone for good.
#[derive(Debug, Clone, Error)]
pub enum BrowserError {
    /// The handle no longer refers to a live element
    #[error("stale element reference: {0}")]
    Stale(String),

    /// Nothing matched the locator
    #[error("no element matches `{0}`")]
    NotFound(String),

    /// A condition wait elapsed without the condition holding
    #[error("timed out after {timeout:?} waiting for `{locator}`")]
    Timeout { locator: String, timeout: Duration },

    /// The WebDriver session cannot be used anymore
    #[error("session lost: {0}")]
    SessionLost(String),

    /// A script ran but returned something we could not interpret
    #[error("unexpected script result: {0}")]
    Script(String),

    /// Any other failed WebDriver command
    #[error("webdriver command failed: {0}")]
    Command(String),
}

impl BrowserError {
    /// Whether the failure means "the thing is not there" rather than "something broke"
    pub fn is_miss(&self) -> bool {
        matches!(self, BrowserError::NotFound(_) | BrowserError::Timeout { .. })
    }
}

/// Run-level failures surfaced to the caller of [`crate::Harvest::run`].
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("could not connect to any WebDriver server (tried {0})")]
    Connect(String),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("malformed result document: {0}")]
    Json(#[from] serde_json::Error),
}
