use crate::errors::SyncError;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, IntoUrl};
use std::time::Duration;
use std::time::Instant;

pub struct ScraperClient {
    client: Client,
    request_id: u64,
    stats: ScraperClientStats,
}

// Stats struct for tracking usage (optional)
#[derive(Default)]
struct ScraperClientStats {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
}

impl ScraperClient {
    /// Create a new scraper client with the default timeout
    pub fn new_http() -> Self {
        Self::new_with_config(Duration::from_secs(30))
    }

    /// Create a new scraper client with a custom timeout
    fn new_with_config(timeout: Duration) -> Self {
        let client = Client::builder()
            .default_headers(Self::default_headers())
            .timeout(timeout)
            .pool_idle_timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            request_id: 0,
            stats: ScraperClientStats::default(),
        }
    }

    /// Default headers for the client
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("letzplay-sync/0.1"));
        headers
    }

    /// Asynchronously fetch the body of a page. One attempt only: network
    /// errors and non-success statuses propagate to the caller.
    pub async fn fetch_url<U: IntoUrl>(&mut self, url: U) -> Result<String, SyncError> {
        self.request_id += 1;
        let start_time = Instant::now();
        log::debug!("Fetching page with request ID: {}", self.request_id);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                self.record_failure();
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            self.record_failure();
            return Err(SyncError::HttpStatus {
                status,
                url: response.url().to_string(),
            });
        }

        let body = response.text().await?;
        self.record_success();
        log::debug!(
            "Request {} succeeded after {:?}",
            self.request_id,
            start_time.elapsed()
        );
        Ok(body)
    }

    /// Track a successful request in the stats
    fn record_success(&mut self) {
        self.stats.total_requests += 1;
        self.stats.successful_requests += 1;
    }

    /// Track a failed request in the stats
    fn record_failure(&mut self) {
        self.stats.total_requests += 1;
        self.stats.failed_requests += 1;
    }

    /// Print the current statistics (total requests, successes, failures)
    pub fn print_stats(&self) {
        println!(
            "Total Requests: {}, Successful: {}, Failed: {}",
            self.stats.total_requests, self.stats.successful_requests, self.stats.failed_requests
        );
    }
}
