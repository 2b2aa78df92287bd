use crate::browser::{Element, Session, settle};
use crate::config::HarvestConfig;
use crate::engine::{NavigationController, PassSummary, ScrollLoader, ScrollOutcome};
use crate::error::BrowserError;
use crate::results::ResultSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Everything a run produced, including the records collected before any failure
#[derive(Debug)]
pub struct Collected {
    pub records: ResultSet,
    pub scroll: Option<ScrollOutcome>,
    pub pass: Option<PassSummary>,
    /// Set when the run stopped on a session-level failure
    pub error: Option<BrowserError>,
}

/// Opens the start page and submits the search query
pub async fn search<S: Session>(session: &S, config: &HarvestConfig) -> Result<(), BrowserError> {
    ::log::info!("Opening {}", config.start_url);
    session.goto(&config.start_url).await?;
    settle(config.timing.page_load()).await;

    ::log::info!("Searching for {}", config.query);
    let input = session
        .wait_for(&config.selectors.search_input, config.timing.results_wait())
        .await?;
    input.clear().await?;
    input.send_keys(&config.query).await?;
    input.press_enter().await?;

    match session
        .wait_for(&config.selectors.feed, config.timing.results_wait())
        .await
    {
        Ok(_) => Ok(()),
        Err(e) if e.is_miss() => {
            ::log::warn!("Results list did not appear: {}", e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Search, scroll, then one traversal pass.
///
/// Never discards records: whatever the controller collected is returned
/// alongside the error that stopped the run, if any. Setting `shutdown`
/// ends scrolling and traversal early with the records gathered so far.
pub async fn collect<S: Session>(
    session: &S,
    config: &HarvestConfig,
    shutdown: &AtomicBool,
) -> Collected {
    let mut collected = Collected {
        records: ResultSet::new(),
        scroll: None,
        pass: None,
        error: None,
    };

    if let Err(e) = search(session, config).await {
        ::log::error!("Search failed: {}", e);
        collected.error = Some(e);
        return collected;
    }

    let scroll = ScrollLoader::new(session, config)
        .with_shutdown(shutdown)
        .run()
        .await;
    collected.scroll = Some(scroll);
    if !scroll.container_found {
        ::log::warn!("No scrollable results list, skipping extraction");
        return collected;
    }
    if shutdown.load(Ordering::SeqCst) {
        return collected;
    }

    let mut controller = NavigationController::new(session, config).with_shutdown(shutdown);
    match controller.traverse().await {
        Ok(summary) => collected.pass = Some(summary),
        Err(e) => collected.error = Some(e),
    }
    collected.records = controller.into_results();
    collected
}
