use super::client::HttpClient;
use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()?;
        Ok(Self(client))
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn get(&self, url: Url) -> Result<Vec<u8>> {
        let resp = self.0.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DashboardError::fetch(url.as_str(), format!("HTTP {}", status)));
        }
        Ok(resp.bytes().await?.to_vec())
    }
}
