use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::SourceError;
use crate::traits::ChartFetcher;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36";

/// HTTP fetcher for chart pages. The chart site rejects clients without a
/// browser User-Agent and the `_nss` cookie.
pub struct HttpChartClient {
    client: Client,
}

impl HttpChartClient {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChartFetcher for HttpChartClient {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .header("Cookie", "_nss=1")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::status("chart page", response.status()));
        }

        let body = response.text().await?;
        debug!(url, bytes = body.len(), "Fetched chart page");
        Ok(body)
    }
}
