//! Paginated NetBox list endpoints.

use boxscout_core::Record;
use serde::Deserialize;
use tracing::debug;

use crate::error::InventoryError;

/// Records fetched per page.
const PAGE_SIZE: u32 = 250;

/// One page of a NetBox list endpoint.
#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    results: Vec<Record>,
}

/// Client for the NetBox REST API.
pub struct NetBoxClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl NetBoxClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
        }
    }

    /// List all devices and virtual machines with a primary IP, devices
    /// first, each in API order.
    pub async fn list_records(&self) -> Result<Vec<Record>, InventoryError> {
        let mut records = self
            .fetch_all(&self.list_url("/api/dcim/devices/"))
            .await?;
        records.extend(
            self.fetch_all(&self.list_url("/api/virtualization/virtual-machines/"))
                .await?,
        );
        debug!(records = records.len(), "inventory listing complete");
        Ok(records)
    }

    fn list_url(&self, path: &str) -> String {
        format!(
            "{}{path}?has_primary_ip=true&limit={PAGE_SIZE}",
            self.base_url
        )
    }

    /// Fetch one list endpoint to exhaustion, following `next` links.
    async fn fetch_all(&self, first_url: &str) -> Result<Vec<Record>, InventoryError> {
        let mut url = first_url.to_string();
        let mut records = Vec::new();
        loop {
            let page = self.fetch_page(&url).await?;
            records.extend(page.results);
            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }
        Ok(records)
    }

    async fn fetch_page(&self, url: &str) -> Result<Page, InventoryError> {
        debug!(%url, "fetching inventory page");
        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await
            .map_err(|source| InventoryError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::Status {
                url: url.to_string(),
                status,
            });
        }

        response
            .json::<Page>()
            .await
            .map_err(|source| InventoryError::Decode {
                url: url.to_string(),
                source,
            })
    }
}
