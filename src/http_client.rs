use reqwest::{Client, ClientBuilder};
use scraper::Html;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// Fixed browser identity attached to every request.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Substrings that identify an anti-bot interstitial served instead of real
/// content. A body containing any of these is never returned as a document.
const CHALLENGE_MARKERS: &[&str] = &["Cloudflare", "Just a moment", "Checking your browser"];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("http status {0}")]
    Status(reqwest::StatusCode),
    #[error("anti-bot challenge page detected")]
    ChallengeDetected,
    #[error("all {0} fetch attempts failed")]
    AttemptsExhausted(usize),
}

/// Retry/backoff budget for the fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_attempts: usize,
    /// Base delay; attempt N waits N * base before the next try.
    pub backoff_base_ms: u64,
    /// Fixed cooldown after a detected challenge page.
    pub challenge_cooldown_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_attempts: 3,
            backoff_base_ms: 1000,
            challenge_cooldown_ms: 2000,
        }
    }
}

/// HTML retrieval layer: browser-mimicking headers, request timeout,
/// challenge-page detection, and bounded retry with linear backoff.
///
/// Expected network/HTTP conditions never escape as panics or foreign error
/// types; after the attempt budget is spent the caller sees a single
/// terminal [`FetchError::AttemptsExhausted`].
pub struct PageFetcher {
    client: Client,
    config: FetchConfig,
}

impl PageFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_config(FetchConfig::default())
    }

    pub fn with_config(config: FetchConfig) -> Result<Self, reqwest::Error> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .parse()
                .unwrap(),
        );
        headers.insert("Accept-Language", "en-US,en;q=0.5".parse().unwrap());
        headers.insert("Referer", "https://www.google.com/".parse().unwrap());
        headers.insert("Connection", "keep-alive".parse().unwrap());
        headers.insert("Upgrade-Insecure-Requests", "1".parse().unwrap());

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, config })
    }

    /// True when a response body is a known anti-bot interstitial rather
    /// than real content.
    pub fn is_challenge_page(body: &str) -> bool {
        CHALLENGE_MARKERS.iter().any(|marker| body.contains(marker))
    }

    /// Linear backoff: attempt N sleeps N * base before the next try.
    fn backoff_delay(&self, attempt: usize) -> Duration {
        Duration::from_millis(self.config.backoff_base_ms * attempt as u64)
    }

    async fn try_fetch(&self, url: &str, inspect_challenge: bool) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.text().await?;
        if inspect_challenge && Self::is_challenge_page(&body) {
            return Err(FetchError::ChallengeDetected);
        }
        Ok(body)
    }

    async fn fetch_body(&self, url: &str, inspect_challenge: bool) -> Result<String, FetchError> {
        for attempt in 1..=self.config.max_attempts {
            match self.try_fetch(url, inspect_challenge).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    log::warn!(
                        "fetch attempt {}/{} failed for {}: {}",
                        attempt,
                        self.config.max_attempts,
                        url,
                        e
                    );
                    if attempt < self.config.max_attempts {
                        let delay = match e {
                            FetchError::ChallengeDetected => {
                                Duration::from_millis(self.config.challenge_cooldown_ms)
                            }
                            _ => self.backoff_delay(attempt),
                        };
                        sleep(delay).await;
                    }
                }
            }
        }
        log::error!(
            "giving up on {} after {} attempts",
            url,
            self.config.max_attempts
        );
        Err(FetchError::AttemptsExhausted(self.config.max_attempts))
    }

    /// Fetch a page body under the full retry/challenge policy.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_body(url, true).await
    }

    /// Fetch and parse a page under the full retry/challenge policy.
    pub async fn fetch_document(&self, url: &str) -> Result<Html, FetchError> {
        let body = self.fetch_text(url).await?;
        Ok(Html::parse_document(&body))
    }

    /// Fetch a JSON API response with the same retry budget. API bodies are
    /// not inspected for challenge markers since arbitrary text fields could
    /// contain them.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let body = self.fetch_body(url, false).await?;
        let value = serde_json::from_str(&body).map_err(|e| {
            log::warn!("malformed JSON from {}: {}", url, e);
            FetchError::AttemptsExhausted(self.config.max_attempts)
        })?;
        Ok(value)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_markers_detected() {
        assert!(PageFetcher::is_challenge_page(
            "<html><body>Just a moment...</body></html>"
        ));
        assert!(PageFetcher::is_challenge_page(
            "Checking your browser before accessing"
        ));
        assert!(PageFetcher::is_challenge_page(
            "<script src=\"/cdn-cgi/x.js\"></script>Cloudflare"
        ));
        assert!(!PageFetcher::is_challenge_page(
            "<html><body><h1>Naruto</h1></body></html>"
        ));
    }

    #[test]
    fn backoff_grows_linearly() {
        let fetcher = PageFetcher::with_config(FetchConfig {
            backoff_base_ms: 250,
            ..FetchConfig::default()
        })
        .unwrap();
        assert_eq!(fetcher.backoff_delay(1), Duration::from_millis(250));
        assert_eq!(fetcher.backoff_delay(2), Duration::from_millis(500));
        assert_eq!(fetcher.backoff_delay(3), Duration::from_millis(750));
    }
}
