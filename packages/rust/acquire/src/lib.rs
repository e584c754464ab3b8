//! Page acquisition for rate-table scraping.
//!
//! [`PageAcquirer`] retrieves the rendered HTML for a target page. Static
//! pages are a single GET; script-rendered pages are polled until a CSS
//! readiness selector appears or a configured timeout elapses
//! ([`AcquireMode::WaitFor`]).

use std::time::{Duration, Instant};

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use fdrates_shared::{FdRatesError, FetchConfig, Result};

pub use fdrates_shared::AcquireMode;

/// User-Agent string for fetch requests.
const USER_AGENT: &str = concat!("fdrates/", env!("CARGO_PKG_VERSION"));

/// Fetches page HTML over HTTP.
pub struct PageAcquirer {
    client: Client,
    ready_timeout: Duration,
    ready_poll: Duration,
}

impl PageAcquirer {
    /// Create an acquirer from fetch configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(config.timeout())
            .build()
            .map_err(|e| FdRatesError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            ready_timeout: config.ready_timeout(),
            ready_poll: config.ready_poll(),
        })
    }

    /// Acquire the page at `url` according to `mode`.
    ///
    /// Network or HTTP-status failures are raised; there are no retries.
    pub async fn acquire(&self, url: &Url, mode: &AcquireMode) -> Result<String> {
        match mode {
            AcquireMode::Immediate => self.fetch(url).await,
            AcquireMode::WaitFor { selector } => self.fetch_when_ready(url, selector).await,
        }
    }

    /// Single GET of `url`, returning the body on a 2xx response.
    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FdRatesError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FdRatesError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| FdRatesError::Network(format!("{url}: body read failed: {e}")))
    }

    /// Re-fetch `url` until `ready_selector` matches the document or the
    /// readiness timeout elapses.
    ///
    /// On timeout the last body is returned with a warning; downstream table
    /// extraction then reports the missing section and yields zero rows.
    async fn fetch_when_ready(&self, url: &Url, ready_selector: &str) -> Result<String> {
        let selector = Selector::parse(ready_selector).map_err(|e| {
            FdRatesError::validation(format!("bad readiness selector {ready_selector:?}: {e}"))
        })?;

        let start = Instant::now();
        loop {
            let body = self.fetch(url).await?;

            let ready = {
                let doc = Html::parse_document(&body);
                doc.select(&selector).next().is_some()
            };

            if ready {
                debug!(%url, selector = ready_selector, elapsed_ms = start.elapsed().as_millis(), "page ready");
                return Ok(body);
            }

            if start.elapsed() >= self.ready_timeout {
                warn!(
                    %url,
                    selector = ready_selector,
                    timeout_ms = self.ready_timeout.as_millis(),
                    "readiness timeout, proceeding with last fetched body"
                );
                return Ok(body);
            }

            debug!(%url, selector = ready_selector, "not ready, polling again");
            tokio::time::sleep(self.ready_poll).await;
        }
    }
}
