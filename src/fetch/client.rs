use crate::error::Result;
use async_trait::async_trait;
use reqwest::Url;

/// Transport seam for the data source. Returns the response body of a GET.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: Url) -> Result<Vec<u8>>;
}
