use super::dedup::Deduplicator;
use super::extract::DetailExtractor;
use super::policy::{ErrorRecoveryPolicy, Failure};
use super::selector::SafeSelector;
use super::snapshot::ListSnapshotProvider;
use crate::browser::{Element, Session, settle};
use crate::config::HarvestConfig;
use crate::error::BrowserError;
use crate::results::ResultSet;
use crate::text;
use std::sync::atomic::{AtomicBool, Ordering};

/// Where the controller believes the session is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    AtList,
    AtDetail,
    Recovering,
}

/// What happened to one list index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Extracted,
    Duplicate,
    Skipped,
}

/// How the session got back to the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackRoute {
    /// A declared back control, by position in the selector list
    Control(usize),
    History,
    /// Every fallback failed; traversal continues regardless
    Exhausted,
}

/// Counters for one traversal pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Length of the latest snapshot seen during the pass
    pub snapshot_len: usize,
    pub extracted: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub failed: usize,
    /// The pass stopped early on a shutdown request
    pub interrupted: bool,
}

/// Walks the result list: open each row, extract, go back, repeat.
///
/// Owns the result set for the whole run. Records are appended only once
/// their extraction has finished, and [`into_results`](Self::into_results)
/// hands them over even when a pass ended early.
pub struct NavigationController<'a, S: Session> {
    session: &'a S,
    config: &'a HarvestConfig,
    policy: ErrorRecoveryPolicy,
    dedup: Deduplicator,
    results: ResultSet,
    state: NavState,
    shutdown: Option<&'a AtomicBool>,
}

impl<'a, S: Session> NavigationController<'a, S> {
    pub fn new(session: &'a S, config: &'a HarvestConfig) -> Self {
        Self {
            session,
            config,
            policy: ErrorRecoveryPolicy::from_config(config),
            dedup: Deduplicator::new(),
            results: ResultSet::new(),
            state: NavState::AtList,
            shutdown: None,
        }
    }

    /// Stop at the next index boundary once `flag` is set
    pub fn with_shutdown(mut self, flag: &'a AtomicBool) -> Self {
        self.shutdown = Some(flag);
        self
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn into_results(self) -> ResultSet {
        self.results
    }

    /// Runs one pass over the list in ascending index order.
    ///
    /// The pass ends once every index of the latest snapshot has been marked
    /// processed. A lost session or a shutdown request ends it early.
    pub async fn traverse(&mut self) -> Result<PassSummary, BrowserError> {
        ::log::info!("Looking for businesses to scrape...");
        self.dedup.begin_pass(self.results.records());
        self.state = NavState::AtList;

        let mut summary = PassSummary::default();
        let mut total = ListSnapshotProvider::new(self.session, self.config)
            .fetch()
            .await?
            .len();
        if total == 0 {
            ::log::warn!("No businesses found!");
            return Ok(summary);
        }
        ::log::info!("Found {} businesses to scrape", total);

        let mut index = 0;
        while index < total {
            if self.shutdown_requested() {
                ::log::warn!("Shutdown requested, stopping at index {}", index);
                summary.interrupted = true;
                break;
            }
            if self.dedup.is_processed(index) {
                index += 1;
                continue;
            }

            match self.visit(index, &mut total).await {
                Ok(Visit::Extracted) => summary.extracted += 1,
                Ok(Visit::Duplicate) => summary.duplicates += 1,
                Ok(Visit::Skipped) => summary.skipped += 1,
                Err(e) if self.policy.classify(&e) == Failure::Fatal => {
                    ::log::error!("Session lost at index {}: {}", index, e);
                    return Err(e);
                }
                Err(e) => {
                    ::log::warn!("Error processing business at index {}: {}", index, e);
                    self.dedup.mark_processed(index);
                    summary.failed += 1;
                }
            }
            index += 1;
        }

        summary.snapshot_len = total;
        ::log::info!(
            "All businesses in current view scraped ({} new, {} total so far)",
            summary.extracted,
            self.results.len()
        );
        Ok(summary)
    }

    async fn visit(&mut self, index: usize, total: &mut usize) -> Result<Visit, BrowserError> {
        let items = ListSnapshotProvider::new(self.session, self.config)
            .fetch()
            .await?;
        if !items.is_empty() {
            *total = items.len();
        }
        let Some(item) = items.get(index) else {
            ::log::debug!("Index {} no longer in the list", index);
            self.dedup.mark_processed(index);
            return Ok(Visit::Skipped);
        };
        let row_name = self.row_name(item).await?;
        drop(items);

        if let Some(name) = &row_name {
            if self.dedup.is_known_name(name) {
                ::log::warn!("Skipping duplicate: {}", name);
                self.dedup.mark_processed(index);
                return Ok(Visit::Duplicate);
            }
        }
        ::log::info!(
            "Processing business {}/{}: {}",
            index + 1,
            *total,
            row_name
                .clone()
                .unwrap_or_else(|| text::placeholder_label(index))
        );

        let activation = SafeSelector::new(self.session, self.config, &self.policy)
            .resolve_and_activate(index)
            .await?;
        if !activation.is_activated() {
            ::log::warn!(
                "Failed to click business at index {} ({:?}), skipping...",
                index,
                activation
            );
            self.dedup.mark_processed(index);
            return Ok(Visit::Skipped);
        }
        self.state = NavState::AtDetail;

        let record = DetailExtractor::new(self.session, self.config)
            .extract(row_name)
            .await;
        let visit = if self.dedup.is_known_name(&record.name) {
            ::log::warn!("Skipping duplicate: {}", record.name);
            Visit::Duplicate
        } else {
            self.dedup.remember_name(&record.name);
            ::log::info!("Successfully scraped: {}", record.name);
            self.results.push(record);
            Visit::Extracted
        };
        self.dedup.mark_processed(index);

        self.return_to_list().await;
        Ok(visit)
    }

    /// Name shown in the list row.
    ///
    /// A missing or re-rendered name element gives `None`; any other failure
    /// abandons the index.
    async fn row_name(&self, item: &S::Element) -> Result<Option<String>, BrowserError> {
        let read = async {
            let element = item.find(&self.config.selectors.row_name).await?;
            element.text().await
        };
        match read.await {
            Ok(raw) => Ok(text::clean(&raw)),
            Err(e) => match self.policy.classify(&e) {
                Failure::Missing | Failure::Stale => {
                    ::log::debug!("Row name unavailable: {}", e);
                    Ok(None)
                }
                Failure::Fatal | Failure::Other => Err(e),
            },
        }
    }

    async fn return_to_list(&mut self) -> BackRoute {
        self.navigate_back().await
    }

    /// Tries the declared back controls in order, then history navigation.
    ///
    /// Always ends at [`NavState::AtList`].
    async fn navigate_back(&mut self) -> BackRoute {
        let config = self.config;
        let selectors = &config.selectors;
        let timing = &config.timing;

        let mut route = BackRoute::Exhausted;
        for (position, locator) in selectors.back_buttons.iter().enumerate() {
            let clicked = match self
                .session
                .wait_for_clickable(locator, timing.back_wait())
                .await
            {
                Ok(button) => button.click().await,
                Err(e) => Err(e),
            };
            match clicked {
                Ok(()) => {
                    ::log::debug!("Clicked back button {}", locator);
                    route = BackRoute::Control(position);
                    break;
                }
                Err(e) => ::log::trace!("Back control {} unusable: {}", locator, e),
            }
        }

        if route == BackRoute::Exhausted {
            self.state = NavState::Recovering;
            ::log::info!("Back button not found, using history.go(-1)");
            match self.session.history_back().await {
                Ok(()) => route = BackRoute::History,
                Err(e) => ::log::warn!("Failed to go back to results: {}", e),
            }
        }

        settle(timing.after_back()).await;
        self.state = NavState::AtList;
        route
    }
}
