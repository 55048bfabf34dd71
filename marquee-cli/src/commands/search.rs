//! Search command - free-text title search.

use std::sync::Arc;

use marquee::api::ListingQuery;
use marquee::config::ConfigFile;
use marquee::listing::PaginationCoordinator;
use marquee::model::{GenreDirectory, Movie};

use super::common;
use crate::error::CliError;

/// Run the search command.
pub async fn run(config: &ConfigFile, query: &str) -> Result<(), CliError> {
    let client = Arc::new(common::build_client(config)?);
    let genres = GenreDirectory::fetch(&client)
        .await
        .unwrap_or_default();

    let mut coordinator: PaginationCoordinator<Movie> =
        PaginationCoordinator::new(client.clone(), ListingQuery::top_rated());

    coordinator.search(query).await?;

    match coordinator.search_results() {
        Some(results) if !results.items().is_empty() => {
            println!("{} matches for \"{query}\"", results.total_results());
            println!();
            common::print_listing(results.items(), &genres);
        }
        _ => println!("No matches for \"{query}\"."),
    }

    Ok(())
}
