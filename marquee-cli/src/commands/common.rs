//! Shared helpers for CLI commands.

use std::sync::Arc;

use marquee::api::ApiClient;
use marquee::config::ConfigFile;
use marquee::media::{HttpAssetFetcher, MediaCache, MediaCacheConfig};
use marquee::model::{GenreDirectory, Movie};

use crate::error::CliError;

/// Environment variable consulted when the config file has no API key.
pub const API_KEY_ENV: &str = "MARQUEE_API_KEY";

/// Build the catalog API client: config file first, environment fallback.
pub fn build_client(config: &ConfigFile) -> Result<ApiClient, CliError> {
    let mut settings = config.api.clone();
    if settings.api_key.is_empty() {
        settings.api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
    }
    if settings.api_key.is_empty() {
        return Err(CliError::Config(format!(
            "no API key configured. Set api_key in config.ini or export {API_KEY_ENV}"
        )));
    }
    ApiClient::new(settings).map_err(CliError::Api)
}

/// Build the process-wide media cache handle.
pub fn build_media_cache(config: &ConfigFile) -> Result<Arc<MediaCache>, CliError> {
    let fetcher = HttpAssetFetcher::new().map_err(CliError::Api)?;
    Ok(Arc::new(MediaCache::new(
        Arc::new(fetcher),
        MediaCacheConfig {
            max_bytes: config.cache.memory_size,
        },
    )))
}

/// Print a listing as numbered rows: title, year, rating, genre line.
pub fn print_listing(items: &[Movie], genres: &GenreDirectory) {
    for (index, movie) in items.iter().enumerate() {
        let year = movie
            .release_year()
            .map(|year| year.to_string())
            .unwrap_or_else(|| "----".to_string());
        let genre_line = genres.display_line(&movie.genre_ids).unwrap_or_default();
        println!(
            "{:>4}. {:<42} {}  {:>4.1}  {}",
            index + 1,
            truncate(&movie.title, 42),
            year,
            movie.vote_average,
            genre_line
        );
    }
}

/// Clip a title to a display width, character-safe.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(max.saturating_sub(1)).collect();
        clipped.push('\u{2026}');
        clipped
    }
}
