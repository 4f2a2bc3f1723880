//! Inventory fetch errors.

use thiserror::Error;

/// Errors fetching the record set. All of them abort the whole cycle; there
/// is no per-record retry at this layer.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
