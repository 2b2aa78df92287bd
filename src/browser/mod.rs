//! Browser capabilities the extraction engine runs against.
//!
//! [`Session`] covers page-level commands and document-scoped queries,
//! [`Element`] covers a single live handle. Handles are only valid until the
//! host application re-renders; callers re-query instead of holding on to
//! them. The condition waits come with default implementations that poll
//! until a deadline, so every wait carries an explicit timeout and a distinct
//! [`BrowserError::Timeout`] outcome.

pub mod webdriver;

use crate::error::BrowserError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// A live element handle
#[async_trait]
pub trait Element: Send + Sync + Sized {
    /// Visible text of the element
    async fn text(&self) -> Result<String, BrowserError>;

    /// Value of a named attribute, `None` when it is not set
    async fn attr(&self, name: &str) -> Result<Option<String>, BrowserError>;

    /// First descendant matching the locator
    async fn find(&self, locator: &str) -> Result<Self, BrowserError>;

    async fn scroll_into_view(&self) -> Result<(), BrowserError>;

    async fn click(&self) -> Result<(), BrowserError>;

    /// Displayed and enabled
    async fn is_clickable(&self) -> Result<bool, BrowserError>;

    async fn clear(&self) -> Result<(), BrowserError>;

    async fn send_keys(&self, text: &str) -> Result<(), BrowserError>;

    /// Commits the input, as pressing Enter would
    async fn press_enter(&self) -> Result<(), BrowserError>;
}

/// The browsing session, exclusively owned by one run
#[async_trait]
pub trait Session: Send + Sync {
    type Element: Element;

    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// First element in the document matching the locator
    async fn find(&self, locator: &str) -> Result<Self::Element, BrowserError>;

    /// Every element in the document matching the locator, in document order
    async fn find_all(&self, locator: &str) -> Result<Vec<Self::Element>, BrowserError>;

    /// Adds `delta` pixels to the region's scroll offset
    async fn scroll_by(&self, region: &Self::Element, delta: i64) -> Result<(), BrowserError>;

    /// Height of the region's scrollable content
    async fn scroll_height(&self, region: &Self::Element) -> Result<i64, BrowserError>;

    /// Steps one entry back in the session history
    async fn history_back(&self) -> Result<(), BrowserError>;

    /// Interval between polls in the default condition waits
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(250)
    }

    /// Waits up to `timeout` for an element matching the locator to be present
    async fn wait_for(
        &self,
        locator: &str,
        timeout: Duration,
    ) -> Result<Self::Element, BrowserError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.find(locator).await {
                Ok(element) => return Ok(element),
                Err(BrowserError::NotFound(_)) | Err(BrowserError::Stale(_)) => {}
                Err(e) => return Err(e),
            }
            if !pause_until(deadline, self.poll_interval()).await {
                return Err(BrowserError::Timeout {
                    locator: locator.to_string(),
                    timeout,
                });
            }
        }
    }

    /// Waits up to `timeout` for an element matching the locator to be clickable
    async fn wait_for_clickable(
        &self,
        locator: &str,
        timeout: Duration,
    ) -> Result<Self::Element, BrowserError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.find(locator).await {
                Ok(element) => match element.is_clickable().await {
                    Ok(true) => return Ok(element),
                    Ok(false) | Err(BrowserError::Stale(_)) => {}
                    Err(e) => return Err(e),
                },
                Err(BrowserError::NotFound(_)) | Err(BrowserError::Stale(_)) => {}
                Err(e) => return Err(e),
            }
            if !pause_until(deadline, self.poll_interval()).await {
                return Err(BrowserError::Timeout {
                    locator: locator.to_string(),
                    timeout,
                });
            }
        }
    }
}

/// Sleeps one poll interval, clamped to the deadline.
///
/// Returns `false` once the deadline has passed and no further poll should be made.
async fn pause_until(deadline: Instant, interval: Duration) -> bool {
    let now = Instant::now();
    if now >= deadline {
        return false;
    }
    tokio::time::sleep(interval.min(deadline - now)).await;
    true
}

/// Pauses for a fixed settle period; zero returns immediately
pub async fn settle(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
