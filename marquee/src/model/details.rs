//! The detail view of a single title.

use serde::{Deserialize, Deserializer};

use crate::api::ApiRequest;

/// Full details for one title, as served by `/movie/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetails {
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl MovieDetails {
    /// Request the details of one title.
    pub fn details(movie_id: u64) -> ApiRequest<MovieDetails> {
        ApiRequest::get(format!("/movie/{movie_id}"))
    }
}

/// Taglines come back as `""` when absent.
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}
