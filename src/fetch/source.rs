use super::client::HttpClient;
use super::guard::{SelectionGuard, Ticket};
use crate::error::{DashboardError, Result};
use crate::models::{DataKind, Dataset, DateWindow};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Fetches record arrays from the data source's JSON endpoints.
///
/// The source is trusted to filter by date but not relied on: every consumer
/// re-filters the returned records against the window.
pub struct DataSourceClient<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> DataSourceClient<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{kind}?date=` for a single day, `?startDate=&endDate=` for a
    /// range.
    pub fn endpoint(&self, kind: DataKind, window: &DateWindow) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, kind.api_path());
        let parsed = if window.is_single_day() {
            Url::parse_with_params(&raw, &[("date", window.from())])
        } else {
            Url::parse_with_params(
                &raw,
                &[("startDate", window.from()), ("endDate", window.to())],
            )
        };
        parsed.map_err(|e| DashboardError::fetch(raw, e))
    }

    pub async fn fetch_dataset(&self, kind: DataKind, window: &DateWindow) -> Result<Dataset> {
        let url = self.endpoint(kind, window)?;
        debug!(url = %url, "Fetching records");

        let body = self.client.get(url.clone()).await?;
        let dataset = match kind {
            DataKind::Traffic => Dataset::Traffic(decode(&url, &body)?),
            DataKind::TrafficTally => Dataset::TrafficTally(decode(&url, &body)?),
            DataKind::Parking => Dataset::Parking(decode(&url, &body)?),
            DataKind::ParkingSnapshot => Dataset::ParkingSnapshot(decode(&url, &body)?),
            DataKind::Weather => Dataset::Weather(decode(&url, &body)?),
        };

        info!(kind = %kind, window = %window, records = dataset.len(), "Fetched records");
        Ok(dataset)
    }

    /// Fetch for the selection behind `ticket`. `Ok(None)` means a newer
    /// selection was issued while this one was in flight.
    pub async fn fetch_for_ticket(
        &self,
        guard: &SelectionGuard,
        ticket: &Ticket,
        kind: DataKind,
    ) -> Result<Option<Dataset>> {
        let dataset = self.fetch_dataset(kind, ticket.window()).await?;
        Ok(guard.accept(ticket, dataset))
    }
}

fn decode<T: DeserializeOwned>(url: &Url, body: &[u8]) -> Result<Vec<T>> {
    serde_json::from_slice(body)
        .map_err(|e| DashboardError::fetch(url.as_str(), format!("undecodable response body: {}", e)))
}
