//! Genre catalog and id-to-name resolution.
//!
//! The genre list is fetched once per process and carried around as a
//! value; listings only have numeric `genre_ids`, so rendering goes
//! through a [`GenreDirectory`] to produce the display line.

use std::collections::HashMap;

use serde::Deserialize;

use crate::api::{ApiClient, ApiRequest, TransportError};

/// One genre as served by `/genre/movie/list`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Wire envelope of the genre list endpoint.
#[derive(Debug, Deserialize)]
pub struct GenreListResponse {
    pub genres: Vec<Genre>,
}

impl Genre {
    /// Request the full genre catalog.
    pub fn list() -> ApiRequest<GenreListResponse> {
        ApiRequest::get("/genre/movie/list")
    }
}

/// Maximum number of genre names shown on one display line.
const DISPLAY_LINE_LIMIT: usize = 3;

/// Resolved genre names, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct GenreDirectory {
    names: HashMap<u64, String>,
}

impl GenreDirectory {
    pub fn from_genres(genres: Vec<Genre>) -> Self {
        Self {
            names: genres
                .into_iter()
                .map(|genre| (genre.id, genre.name))
                .collect(),
        }
    }

    /// Fetch the genre catalog and build a directory from it.
    pub async fn fetch(client: &ApiClient) -> Result<Self, TransportError> {
        let response = client.execute(Genre::list()).await?;
        Ok(Self::from_genres(response.genres))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, id: u64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Display line for a listing row: up to three known names joined
    /// with a bullet, `None` when no id resolves.
    pub fn display_line(&self, ids: &[u64]) -> Option<String> {
        let names: Vec<&str> = ids
            .iter()
            .filter_map(|id| self.name(*id))
            .take(DISPLAY_LINE_LIMIT)
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(" \u{2022} "))
        }
    }
}
