//! Movie list entries as returned by listing endpoints.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};

use super::Page;

/// One entry in a paginated movie listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default, deserialize_with = "release_date")]
    pub release_date: Option<NaiveDate>,
}

impl Movie {
    /// Release year, where the server reported a parseable date.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|date| date.year())
    }
}

impl Page<Movie> {
    /// Drop entries a catalog row cannot render: no poster, or an empty
    /// title. The server includes such stubs in similar-titles listings.
    pub fn without_undisplayable(mut self) -> Self {
        self.results
            .retain(|movie| movie.poster_path.is_some() && !movie.title.is_empty());
        self
    }
}

/// The server sends `""` rather than null for unknown release dates.
fn release_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
}
