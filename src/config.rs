use crate::error::HarvestError;
use crate::results::Field;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Free-text search query that selects the result list
    #[serde(default)]
    pub query: String,

    /// Page the session opens before searching
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default)]
    pub headless: bool,

    /// Where the result document is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// CSS locators for every element the engine touches
    #[serde(default)]
    pub selectors: Selectors,

    /// Waits and pauses, in milliseconds
    #[serde(default)]
    pub timing: Timing,

    /// Round and attempt budgets
    #[serde(default)]
    pub limits: Limits,
}

/// CSS locators used against the host application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub search_input: String,
    /// The results feed; both the list container and the scrollable region
    pub feed: String,
    pub list_item: String,
    /// Name element inside a list row
    pub row_name: String,
    pub detail_title: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub rating: String,
    pub reviews: String,
    /// Back controls, tried in order
    pub back_buttons: Vec<String>,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            search_input: "#searchboxinput".to_string(),
            feed: r#"div[role="feed"]"#.to_string(),
            list_item: "div.Nv2PK".to_string(),
            row_name: "div.fontHeadlineSmall".to_string(),
            detail_title: r#"h1[data-testid="place-title"]"#.to_string(),
            address: r#"button[data-item-id*="address"]"#.to_string(),
            phone: r#"button[data-item-id*="phone"]"#.to_string(),
            website: r#"a[data-item-id*="authority"]"#.to_string(),
            rating: "div.F7nice".to_string(),
            reviews: "span.F7nice".to_string(),
            back_buttons: vec![
                r#"button[jsaction*="back"]"#.to_string(),
                r#"button[aria-label="Back"]"#.to_string(),
                "button.hYBOP".to_string(),
                r#"button[jsaction*="pane.back"]"#.to_string(),
            ],
        }
    }
}

impl Selectors {
    /// Locator of an optional detail field
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Address => &self.address,
            Field::Phone => &self.phone,
            Field::Website => &self.website,
            Field::Rating => &self.rating,
            Field::Reviews => &self.reviews,
        }
    }
}

/// Bounded waits and settle pauses, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Pause after opening the start page
    pub page_load_ms: u64,
    /// Wait for the results feed after submitting the query
    pub results_wait_ms: u64,
    /// Wait for the list container and for its first item
    pub list_wait_ms: u64,
    /// Pause after the list container shows up
    pub list_settle_ms: u64,
    /// Pause after each scroll step
    pub scroll_pause_ms: u64,
    /// Pause between scrolling a row into view and clicking it
    pub pre_click_ms: u64,
    /// Pause after a successful click so the detail panel renders
    pub post_click_ms: u64,
    /// Backoff between activation attempts
    pub retry_backoff_ms: u64,
    /// Wait for the detail heading when the row had no readable name
    pub name_wait_ms: u64,
    /// Wait for each back control to become clickable
    pub back_wait_ms: u64,
    /// Pause after returning to the list
    pub after_back_ms: u64,
    /// Interval between polls in condition waits
    pub poll_interval_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            page_load_ms: 3_000,
            results_wait_ms: 15_000,
            list_wait_ms: 15_000,
            list_settle_ms: 1_000,
            scroll_pause_ms: 3_000,
            pre_click_ms: 1_000,
            post_click_ms: 3_000,
            retry_backoff_ms: 2_000,
            name_wait_ms: 5_000,
            back_wait_ms: 3_000,
            after_back_ms: 3_000,
            poll_interval_ms: 250,
        }
    }
}

impl Timing {
    /// All waits and pauses set to zero; every condition is checked exactly once
    pub fn immediate() -> Self {
        Self {
            page_load_ms: 0,
            results_wait_ms: 0,
            list_wait_ms: 0,
            list_settle_ms: 0,
            scroll_pause_ms: 0,
            pre_click_ms: 0,
            post_click_ms: 0,
            retry_backoff_ms: 0,
            name_wait_ms: 0,
            back_wait_ms: 0,
            after_back_ms: 0,
            poll_interval_ms: 0,
        }
    }

    pub fn page_load(&self) -> Duration {
        Duration::from_millis(self.page_load_ms)
    }

    pub fn results_wait(&self) -> Duration {
        Duration::from_millis(self.results_wait_ms)
    }

    pub fn list_wait(&self) -> Duration {
        Duration::from_millis(self.list_wait_ms)
    }

    pub fn list_settle(&self) -> Duration {
        Duration::from_millis(self.list_settle_ms)
    }

    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    pub fn pre_click(&self) -> Duration {
        Duration::from_millis(self.pre_click_ms)
    }

    pub fn post_click(&self) -> Duration {
        Duration::from_millis(self.post_click_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn name_wait(&self) -> Duration {
        Duration::from_millis(self.name_wait_ms)
    }

    pub fn back_wait(&self) -> Duration {
        Duration::from_millis(self.back_wait_ms)
    }

    pub fn after_back(&self) -> Duration {
        Duration::from_millis(self.after_back_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Round and attempt budgets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Upper bound on scroll rounds
    pub scroll_rounds: usize,
    /// Early stop is only allowed once the round index exceeds this
    pub min_scroll_rounds: usize,
    /// Pixels added to the feed's scroll offset per round
    pub scroll_increment: i64,
    /// Resolve-and-click attempts per list index
    pub select_attempts: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            scroll_rounds: 20,
            min_scroll_rounds: 5,
            scroll_increment: 300,
            select_attempts: 3,
        }
    }
}

/// Default value for start_url
fn default_start_url() -> String {
    "https://www.google.com/maps".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default value for output_path
fn default_output_path() -> PathBuf {
    PathBuf::from("businesses.json")
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::new("")
    }
}

impl HarvestConfig {
    /// Create a new configuration with default values
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            start_url: default_start_url(),
            webdriver_url: default_webdriver_url(),
            headless: false,
            output_path: default_output_path(),
            selectors: Selectors::default(),
            timing: Timing::default(),
            limits: Limits::default(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HarvestError> {
        let path = path.as_ref();
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|e| HarvestError::Config(format!("{}: {}", path.display(), e)))?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, HarvestError> {
        serde_json::from_str(json).map_err(|e| HarvestError::Config(e.to_string()))
    }

    /// Checks the values the run cannot proceed without
    pub fn validate(&self) -> Result<(), HarvestError> {
        if self.query.trim().is_empty() {
            return Err(HarvestError::Config("search query is empty".to_string()));
        }
        Url::parse(&self.start_url)
            .map_err(|e| HarvestError::Config(format!("start_url {}: {}", self.start_url, e)))?;
        Url::parse(&self.webdriver_url).map_err(|e| {
            HarvestError::Config(format!("webdriver_url {}: {}", self.webdriver_url, e))
        })?;
        if self.limits.select_attempts == 0 {
            return Err(HarvestError::Config(
                "limits.select_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
