use crate::browser::{Session, settle};
use crate::config::HarvestConfig;
use crate::error::BrowserError;

/// Fetches the currently rendered list rows.
///
/// Every call re-queries the page. The returned handles are only good until
/// the host application re-renders, so nothing is cached between calls.
pub struct ListSnapshotProvider<'a, S: Session> {
    session: &'a S,
    config: &'a HarvestConfig,
}

impl<'a, S: Session> ListSnapshotProvider<'a, S> {
    pub fn new(session: &'a S, config: &'a HarvestConfig) -> Self {
        Self { session, config }
    }

    /// Returns the rows in document order.
    ///
    /// An absent container or an empty list yields an empty snapshot. Only a
    /// lost session is reported as an error.
    pub async fn fetch(&self) -> Result<Vec<S::Element>, BrowserError> {
        let selectors = &self.config.selectors;
        let timing = &self.config.timing;

        if let Err(e) = self
            .session
            .wait_for(&selectors.feed, timing.list_wait())
            .await
        {
            return empty_unless_fatal(e, "list container");
        }
        settle(timing.list_settle()).await;

        if let Err(e) = self
            .session
            .wait_for(&selectors.list_item, timing.list_wait())
            .await
        {
            return empty_unless_fatal(e, "list items");
        }

        match self.session.find_all(&selectors.list_item).await {
            Ok(items) => {
                ::log::trace!("Snapshot holds {} rows", items.len());
                Ok(items)
            }
            Err(e) => empty_unless_fatal(e, "list items"),
        }
    }
}

fn empty_unless_fatal<E>(error: BrowserError, what: &str) -> Result<Vec<E>, BrowserError> {
    if matches!(error, BrowserError::SessionLost(_)) {
        return Err(error);
    }
    if error.is_miss() {
        ::log::debug!("No {} available: {}", what, error);
    } else {
        ::log::warn!("Error getting fresh {}: {}", what, error);
    }
    Ok(Vec::new())
}
