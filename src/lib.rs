// Re-export modules
pub mod browser;
pub mod config;
pub mod engine;
pub mod error;
pub mod harvest;
pub mod output;
pub mod results;
pub mod text;

// Re-export commonly used types for convenience
pub use config::HarvestConfig;
pub use error::{BrowserError, HarvestError};
pub use results::{BusinessRecord, Field, ResultSet};

use browser::Session;
use browser::webdriver::WebDriverSession;
use engine::{PassSummary, ScrollOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Records collected
    pub records: usize,
    /// Output file, when anything was written
    pub written_to: Option<PathBuf>,
    pub scroll: Option<ScrollOutcome>,
    pub pass: Option<PassSummary>,
    /// The run was stopped by a shutdown request
    pub interrupted: bool,
}

/// Main builder for a harvest run
pub struct Harvest {
    config: HarvestConfig,
    shutdown: Arc<AtomicBool>,
}

impl Harvest {
    /// Create a new Harvest builder for the given search query
    pub fn new(query: &str) -> Self {
        Self {
            config: HarvestConfig::new(query),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use a full configuration; a non-empty query given to `new` is kept
    pub fn with_config(mut self, mut config: HarvestConfig) -> Self {
        if !self.config.query.is_empty() {
            config.query = std::mem::take(&mut self.config.query);
        }
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, HarvestError> {
        let config = HarvestConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set where the result document is written
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// Set the WebDriver URL
    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self
    }

    /// Run the browser without a window
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Flag that stops the run at the next safe point; collected records are still written
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Connect to WebDriver, harvest, write the output and close the session
    pub async fn run(mut self) -> Result<RunReport, HarvestError> {
        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.config.webdriver_url = webdriver_url;
            }
        }
        self.config.validate()?;

        let session = WebDriverSession::connect(&self.config.webdriver_url, self.config.headless)
            .await
            .ok_or_else(|| HarvestError::Connect(self.config.webdriver_url.clone()))?
            .with_poll_interval(self.config.timing.poll_interval());

        // Ctrl+C stops the run but still exports what was collected
        let shutdown = self.shutdown_handle();
        let signal = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ::log::warn!("Received interrupt, saving collected data...");
                shutdown.store(true, Ordering::SeqCst);
            }
        });

        let report = self.run_on(&session).await;
        signal.abort();

        ::log::info!("Closing browser...");
        session.close().await;
        report
    }

    /// Harvest with an already open session.
    ///
    /// The output is flushed before any run-level error is returned.
    pub async fn run_on<S: Session>(&self, session: &S) -> Result<RunReport, HarvestError> {
        let collected = harvest::collect(session, &self.config, &self.shutdown).await;

        let path = &self.config.output_path;
        let flushed = output::flush(&collected.records, path);
        if let Some(e) = collected.error {
            if let Err(flush_error) = &flushed {
                ::log::error!("Error exporting to JSON: {}", flush_error);
            }
            return Err(e.into());
        }

        Ok(RunReport {
            records: collected.records.len(),
            written_to: flushed?.then(|| path.clone()),
            scroll: collected.scroll,
            pass: collected.pass,
            interrupted: self.shutdown.load(Ordering::SeqCst),
        })
    }
}
