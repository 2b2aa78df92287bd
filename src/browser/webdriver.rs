use super::{Element, Session};
use crate::error::BrowserError;
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::key::Key;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};
use std::time::Duration;

/// Session backed by a fantoccini WebDriver client
#[derive(Clone)]
pub struct WebDriverSession {
    client: Client,
    poll_interval: Duration,
}

/// Element handle backed by fantoccini.
///
/// Keeps a clone of the client so scripts can run against the element.
#[derive(Clone)]
pub struct WebDriverElement {
    client: Client,
    element: fantoccini::elements::Element,
}

impl WebDriverSession {
    /// Connects to the WebDriver instance, trying common local endpoints when
    /// the configured one does not answer.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Option<Self> {
        let capabilities = browser_capabilities(headless);

        match connect_with(webdriver_url, &capabilities).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Some(Self::new(client));
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    webdriver_url,
                    e
                );
            }
        }

        // If we couldn't connect, try with common alternative URLs
        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://localhost:4444", // geckodriver / Selenium default
            "http://127.0.0.1:4444", // Try with IP instead of localhost
        ];

        for url in fallback_urls.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = connect_with(url, &capabilities).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Some(Self::new(client));
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        None
    }

    pub fn new(client: Client) -> Self {
        Self {
            client,
            poll_interval: Duration::from_millis(250),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Ends the WebDriver session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }

    fn wrap(&self, element: fantoccini::elements::Element) -> WebDriverElement {
        WebDriverElement {
            client: self.client.clone(),
            element,
        }
    }

    async fn run_on(
        &self,
        script: &str,
        region: &WebDriverElement,
    ) -> Result<Value, BrowserError> {
        let arg = serde_json::to_value(&region.element)
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        self.client
            .execute(script, vec![arg])
            .await
            .map_err(|e| classify(e, "script"))
    }
}

async fn connect_with(
    url: &str,
    capabilities: &serde_json::Map<String, Value>,
) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    builder.connect(url).await
}

/// Capabilities for Chrome and Firefox drivers alike
fn browser_capabilities(headless: bool) -> serde_json::Map<String, Value> {
    let mut chrome_args = vec!["--start-maximized"];
    let mut firefox_args = Vec::new();
    if headless {
        chrome_args.push("--headless=new");
        chrome_args.push("--window-size=1280,800");
        firefox_args.push("-headless");
    }

    let mut capabilities = serde_json::Map::new();
    capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
    capabilities.insert(
        "moz:firefoxOptions".to_string(),
        json!({ "args": firefox_args }),
    );
    capabilities
}

/// Maps a fantoccini command error into the crate's taxonomy.
///
/// Uses the W3C error code, never the driver's message text, which differs
/// between chromedriver and geckodriver.
fn classify(error: CmdError, locator: &str) -> BrowserError {
    match error {
        CmdError::Lost(_) | CmdError::Failed(_) | CmdError::FailedC(_) => {
            BrowserError::SessionLost(error.to_string())
        }
        CmdError::WaitTimeout => BrowserError::NotFound(locator.to_string()),
        ref e if e.is_no_such_element() => BrowserError::NotFound(locator.to_string()),
        ref e if e.is_stale_element_reference() => BrowserError::Stale(e.to_string()),
        ref e if e.is_invalid_session_id() || e.is_no_such_window() => {
            BrowserError::SessionLost(e.to_string())
        }
        ref e if e.is_javascript_error() => BrowserError::Script(e.to_string()),
        e => BrowserError::Command(e.to_string()),
    }
}

#[async_trait]
impl Element for WebDriverElement {
    async fn text(&self) -> Result<String, BrowserError> {
        self.element.text().await.map_err(|e| classify(e, "text"))
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, BrowserError> {
        self.element.attr(name).await.map_err(|e| classify(e, name))
    }

    async fn find(&self, locator: &str) -> Result<Self, BrowserError> {
        let element = self
            .element
            .find(Locator::Css(locator))
            .await
            .map_err(|e| classify(e, locator))?;
        Ok(Self {
            client: self.client.clone(),
            element,
        })
    }

    async fn scroll_into_view(&self) -> Result<(), BrowserError> {
        let arg = serde_json::to_value(&self.element)
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        self.client
            .execute("arguments[0].scrollIntoView({block: 'center'});", vec![arg])
            .await
            .map_err(|e| classify(e, "scrollIntoView"))?;
        Ok(())
    }

    async fn click(&self) -> Result<(), BrowserError> {
        self.element.click().await.map_err(|e| classify(e, "click"))
    }

    async fn is_clickable(&self) -> Result<bool, BrowserError> {
        let displayed = self
            .element
            .is_displayed()
            .await
            .map_err(|e| classify(e, "displayed"))?;
        if !displayed {
            return Ok(false);
        }
        self.element
            .is_enabled()
            .await
            .map_err(|e| classify(e, "enabled"))
    }

    async fn clear(&self) -> Result<(), BrowserError> {
        self.element.clear().await.map_err(|e| classify(e, "clear"))
    }

    async fn send_keys(&self, text: &str) -> Result<(), BrowserError> {
        self.element
            .send_keys(text)
            .await
            .map_err(|e| classify(e, "send_keys"))
    }

    async fn press_enter(&self) -> Result<(), BrowserError> {
        self.element
            .send_keys(&Key::Enter)
            .await
            .map_err(|e| classify(e, "enter"))
    }
}

#[async_trait]
impl Session for WebDriverSession {
    type Element = WebDriverElement;

    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.client.goto(url).await.map_err(|e| classify(e, url))
    }

    async fn find(&self, locator: &str) -> Result<WebDriverElement, BrowserError> {
        let element = self
            .client
            .find(Locator::Css(locator))
            .await
            .map_err(|e| classify(e, locator))?;
        Ok(self.wrap(element))
    }

    async fn find_all(&self, locator: &str) -> Result<Vec<WebDriverElement>, BrowserError> {
        let elements = self
            .client
            .find_all(Locator::Css(locator))
            .await
            .map_err(|e| classify(e, locator))?;
        Ok(elements.into_iter().map(|e| self.wrap(e)).collect())
    }

    async fn scroll_by(&self, region: &WebDriverElement, delta: i64) -> Result<(), BrowserError> {
        let script = format!("arguments[0].scrollTop += {};", delta);
        self.run_on(&script, region).await?;
        Ok(())
    }

    async fn scroll_height(&self, region: &WebDriverElement) -> Result<i64, BrowserError> {
        let value = self
            .run_on("return arguments[0].scrollHeight;", region)
            .await?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|h| h as i64))
            .ok_or_else(|| BrowserError::Script(format!("scrollHeight returned {}", value)))
    }

    async fn history_back(&self) -> Result<(), BrowserError> {
        self.client
            .execute("window.history.go(-1)", Vec::new())
            .await
            .map_err(|e| classify(e, "history.go(-1)"))?;
        Ok(())
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    async fn wait_for(
        &self,
        locator: &str,
        timeout: Duration,
    ) -> Result<WebDriverElement, BrowserError> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .every(self.poll_interval)
            .for_element(Locator::Css(locator))
            .await
        {
            Ok(element) => Ok(self.wrap(element)),
            Err(CmdError::WaitTimeout) => Err(BrowserError::Timeout {
                locator: locator.to_string(),
                timeout,
            }),
            Err(e) => Err(classify(e, locator)),
        }
    }
}
