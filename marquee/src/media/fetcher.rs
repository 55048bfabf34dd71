//! Fetch-and-decode boundary for remote media.
//!
//! An [`AssetFetcher`] is a pure function of a URL: fetch the bytes,
//! decode them, hand back an [`Asset`]. No caching lives here - the cache
//! wraps a fetcher, never the other way around.

use std::time::Duration;

use bytes::Bytes;
use tracing::debug;

use crate::api::{BoxFuture, TransportError};

use super::asset::Asset;
use super::error::FetchError;

/// Default timeout for media downloads.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches and decodes one remote asset.
///
/// Trait seam for dependency injection: tests substitute a mock fetcher,
/// production wires in [`HttpAssetFetcher`].
pub trait AssetFetcher: Send + Sync {
    fn fetch_asset<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Asset, FetchError>>;
}

/// Real fetcher backed by reqwest plus the `image` decoder.
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a fetcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}

impl AssetFetcher for HttpAssetFetcher {
    fn fetch_asset<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Asset, FetchError>> {
        Box::pin(async move {
            let bytes = self.fetch_bytes(url).await?;
            debug!(url, bytes = bytes.len(), "decoding fetched asset");
            let asset = Asset::from_bytes(&bytes)?;
            Ok(asset)
        })
    }
}
