//! The paginated envelope returned by every listing endpoint.

use serde::Deserialize;

/// One page of results plus the paging metadata the server reports.
///
/// `total_pages` and `total_results` are authoritative and may change
/// between fetches - the catalog is live data.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "page")]
    pub page_number: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Whether a page beyond this one exists.
    pub fn has_more(&self) -> bool {
        self.total_pages > 0 && self.page_number < self.total_pages
    }
}
