//! Poster command - download a title's poster through the media cache.

use std::path::Path;

use marquee::config::ConfigFile;
use marquee::model::MovieDetails;

use super::common;
use crate::error::CliError;

/// Run the poster command.
pub async fn run(config: &ConfigFile, id: u64, out: &Path) -> Result<(), CliError> {
    let client = common::build_client(config)?;
    let details = client.execute(MovieDetails::details(id)).await?;

    let Some(poster_path) = details.poster_path.as_deref() else {
        return Err(CliError::Media(format!(
            "\"{}\" has no poster",
            details.title
        )));
    };

    let cache = common::build_media_cache(config)?;
    let url = config.images.poster_url(poster_path);

    match cache.get_asset(&url).await {
        Some(asset) => {
            asset
                .image()
                .save(out)
                .map_err(|e| CliError::Media(format!("failed to save poster: {e}")))?;
            println!(
                "Saved {}x{} poster for \"{}\" to {}",
                asset.width(),
                asset.height(),
                details.title,
                out.display()
            );
            Ok(())
        }
        // Asset failures are silent at the cache layer; all we know here
        // is that nothing arrived.
        None => Err(CliError::Media(format!(
            "poster could not be fetched from {url}"
        ))),
    }
}
