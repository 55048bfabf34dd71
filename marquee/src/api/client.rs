//! HTTP client for the catalog API.
//!
//! [`ApiClient`] is the concrete reqwest-backed transport. The coordinator
//! never sees it directly - it consumes the [`PageSource`] trait, which is
//! dyn-compatible (boxed futures) so tests can substitute a scripted source
//! without touching the network.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{DecodeError, TransportError};
use super::request::{ApiRequest, ListingQuery};
use crate::config::ApiSettings;
use crate::model::Page;

/// Default timeout for catalog API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A source of paginated envelopes for one listing.
///
/// The coordinator issues every fetch through this seam. Next-page requests
/// carry an explicit `page` parameter; first-page, refresh, and search
/// requests pass `None` and let the server default to page 1.
pub trait PageSource<T>: Send + Sync {
    fn fetch_page<'a>(
        &'a self,
        query: &'a ListingQuery,
        page: Option<u32>,
    ) -> BoxFuture<'a, Result<Page<T>, TransportError>>;
}

/// Reqwest-backed client for the catalog API.
pub struct ApiClient {
    http: reqwest::Client,
    settings: ApiSettings,
}

impl ApiClient {
    /// Create a client with the default request timeout.
    pub fn new(settings: ApiSettings) -> Result<Self, TransportError> {
        Self::with_timeout(settings, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(settings: ApiSettings, timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http, settings })
    }

    /// Execute a typed request and decode its JSON body.
    pub async fn execute<V: DeserializeOwned>(
        &self,
        request: ApiRequest<V>,
    ) -> Result<V, TransportError> {
        let url = self.request_url(request.path(), request.params())?;
        debug!(method = request.method().as_str(), %url, "executing API request");

        let response = self
            .http
            .get(url.clone())
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

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(serde_json::from_slice(&body).map_err(DecodeError::Json)?)
    }

    /// Build the full request URL: base + path, then api_key, language, and
    /// the request's own parameters, in that order.
    fn request_url(&self, path: &str, params: &[(String, String)]) -> Result<Url, TransportError> {
        let joined = format!("{}{}", self.settings.base_url.trim_end_matches('/'), path);
        let mut url =
            Url::parse(&joined).map_err(|e| TransportError::Url(format!("{joined}: {e}")))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.settings.api_key);
            if let Some(language) = &self.settings.language {
                pairs.append_pair("language", language);
            }
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

impl<T> PageSource<T> for ApiClient
where
    T: DeserializeOwned + Send + 'static,
{
    fn fetch_page<'a>(
        &'a self,
        query: &'a ListingQuery,
        page: Option<u32>,
    ) -> BoxFuture<'a, Result<Page<T>, TransportError>> {
        Box::pin(async move {
            let mut request: ApiRequest<Page<T>> =
                ApiRequest::get(query.path()).with_params(query.params().iter().cloned());
            if let Some(page) = page {
                request = request.with_param("page", page.to_string());
            }
            self.execute(request).await
        })
    }
}
