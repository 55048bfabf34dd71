//! Typed request descriptors for the catalog API.
//!
//! An [`ApiRequest`] names an endpoint and carries the decoded response type
//! as a phantom parameter, so `client.execute(MovieDetails::details(603))`
//! decodes straight into `MovieDetails` without turbofish noise at call
//! sites. A [`ListingQuery`] is the subset a paginated listing needs to
//! re-issue itself for later pages.

use std::marker::PhantomData;

/// HTTP methods the catalog API uses. Read-only API, so just GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
        }
    }
}

/// A single request against the catalog API, typed by its response value.
#[derive(Debug)]
pub struct ApiRequest<V> {
    method: Method,
    path: String,
    params: Vec<(String, String)>,
    _value: PhantomData<fn() -> V>,
}

impl<V> ApiRequest<V> {
    /// Build a GET request for the given path (e.g. `/movie/top_rated`).
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            params: Vec::new(),
            _value: PhantomData,
        }
    }

    /// Append a query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Append several query parameters.
    pub fn with_params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// The re-issuable description of one paginated listing.
///
/// A coordinator holds one of these and replays it for page 1 (first load,
/// refresh) or page N+1 (load more). `source_key` correlates the listing to
/// a parent entity where one exists - for a similar-titles listing it is
/// the parent movie's id - and travels into the resulting
/// [`PageState`](crate::listing::PageState) snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    path: String,
    params: Vec<(String, String)>,
    source_key: Option<String>,
}

impl ListingQuery {
    /// The top-rated titles listing.
    pub fn top_rated() -> Self {
        Self {
            path: "/movie/top_rated".to_string(),
            params: Vec::new(),
            source_key: None,
        }
    }

    /// Titles similar to the given one. The parent id becomes the
    /// listing's source key.
    pub fn similar(movie_id: u64) -> Self {
        Self {
            path: format!("/movie/{movie_id}/similar"),
            params: Vec::new(),
            source_key: Some(movie_id.to_string()),
        }
    }

    /// Free-text title search.
    pub fn search(text: &str) -> Self {
        Self {
            path: "/search/movie".to_string(),
            params: vec![("query".to_string(), text.to_string())],
            source_key: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn source_key(&self) -> Option<&str> {
        self.source_key.as_deref()
    }
}
