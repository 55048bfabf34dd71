//! Details command - one title plus its similar-titles strip.

use marquee::api::{ListingQuery, PageSource, TransportError};
use marquee::config::ConfigFile;
use marquee::model::{Movie, MovieDetails, Page};
use tracing::debug;

use super::common;
use crate::error::CliError;

/// How many similar titles the strip shows.
const SIMILAR_STRIP_LEN: usize = 8;

/// Run the details command.
pub async fn run(config: &ConfigFile, id: u64) -> Result<(), CliError> {
    let client = common::build_client(config)?;

    let details = client.execute(MovieDetails::details(id)).await?;

    println!("{}", details.title);
    if let Some(tagline) = &details.tagline {
        println!("{tagline}");
    }
    if !details.overview.is_empty() {
        println!();
        println!("{}", details.overview);
    }

    // The strip is decoration; its fetch failing leaves the details intact.
    let similar: Result<Page<Movie>, TransportError> =
        client.fetch_page(&ListingQuery::similar(id), None).await;
    match similar {
        Ok(page) => {
            let page = page.without_undisplayable();
            if !page.results.is_empty() {
                println!();
                println!("Similar titles:");
                for movie in page.results.iter().take(SIMILAR_STRIP_LEN) {
                    let year = movie
                        .release_year()
                        .map(|year| format!(" ({year})"))
                        .unwrap_or_default();
                    println!("  - {}{}", common::truncate(&movie.title, 50), year);
                }
            }
        }
        Err(err) => {
            debug!(id, error = %err, "similar titles unavailable");
        }
    }

    Ok(())
}
