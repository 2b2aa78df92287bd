use crate::browser::{Session, settle};
use crate::config::HarvestConfig;
use crate::error::BrowserError;
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of a scroll-loading run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Whether the scrollable feed was found at all
    pub container_found: bool,
    /// Scroll steps issued
    pub rounds: usize,
}

/// Scrolls the results feed until it stops growing or the round budget runs out.
///
/// Growth detection is a heuristic: the feed may still be loading when the
/// height is read, and traversal re-snapshots the list anyway.
pub struct ScrollLoader<'a, S: Session> {
    session: &'a S,
    config: &'a HarvestConfig,
    shutdown: Option<&'a AtomicBool>,
}

impl<'a, S: Session> ScrollLoader<'a, S> {
    pub fn new(session: &'a S, config: &'a HarvestConfig) -> Self {
        Self {
            session,
            config,
            shutdown: None,
        }
    }

    /// Stop before the next round once `flag` is set
    pub fn with_shutdown(mut self, flag: &'a AtomicBool) -> Self {
        self.shutdown = Some(flag);
        self
    }

    pub async fn run(&self) -> ScrollOutcome {
        let limits = &self.config.limits;
        ::log::info!("Starting to scroll for more results...");

        let region = match self
            .session
            .wait_for(&self.config.selectors.feed, self.config.timing.list_wait())
            .await
        {
            Ok(region) => region,
            Err(e) => {
                ::log::warn!("Error finding scrollable area: {}", e);
                return ScrollOutcome {
                    container_found: false,
                    rounds: 0,
                };
            }
        };
        ::log::debug!("Found scrollable container");

        let mut previous_height = -1;
        let mut rounds = 0;

        for round in 0..limits.scroll_rounds {
            if self.shutdown.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
                ::log::warn!("Shutdown requested, stopping scroll");
                break;
            }
            let new_height = match self.step(&region).await {
                Ok(height) => height,
                Err(e) => {
                    ::log::warn!("Error during scrolling: {}", e);
                    break;
                }
            };
            rounds += 1;
            ::log::debug!(
                "Scroll attempt {}/{} (height {})",
                round + 1,
                limits.scroll_rounds,
                new_height
            );

            if new_height == previous_height && round > limits.min_scroll_rounds {
                ::log::info!("No more results to load");
                break;
            }
            previous_height = new_height;
        }

        ::log::info!("Finished scrolling ({} scrolls)", rounds);
        ScrollOutcome {
            container_found: true,
            rounds,
        }
    }

    /// One round: advance the offset, let the feed load, read the new height
    async fn step(&self, region: &S::Element) -> Result<i64, BrowserError> {
        let before = self.session.scroll_height(region).await?;
        self.session
            .scroll_by(region, self.config.limits.scroll_increment)
            .await?;
        settle(self.config.timing.scroll_pause()).await;
        let after = self.session.scroll_height(region).await?;
        ::log::trace!("Feed height {} -> {}", before, after);
        Ok(after)
    }
}
