//! Implements the `Source` trait by downloading the sales document over HTTP.

use crate::api::Source;
use crate::model::{parse_records, Record};
use crate::Result;
use anyhow::{bail, Context};
use tracing::{debug, info};
use url::Url;

/// Downloads the sales document with a single GET. There is no timeout and no retry; any failure
/// ends the run.
pub struct HttpSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Source for HttpSource {
    async fn fetch(&mut self) -> Result<Vec<Record>> {
        info!("Downloading sales data from {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            bail!("Download of {} failed with status {}: {}", self.url, status, body);
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {}", self.url))?;
        debug!("Received {} bytes", body.len());

        let json: serde_json::Value = serde_json::from_slice(&body)
            .with_context(|| format!("Response from {} is not valid JSON", self.url))?;
        let records = parse_records(json)?;
        info!("Downloaded {} sales records", records.len());
        Ok(records)
    }
}
