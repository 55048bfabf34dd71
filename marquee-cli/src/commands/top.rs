//! Top command - browse the top-rated listing.

use std::sync::Arc;

use marquee::api::ListingQuery;
use marquee::config::ConfigFile;
use marquee::listing::PaginationCoordinator;
use marquee::model::{GenreDirectory, Movie};

use super::common;
use crate::error::CliError;

/// Run the top command, loading up to `pages` pages.
pub async fn run(config: &ConfigFile, pages: u32) -> Result<(), CliError> {
    let client = Arc::new(common::build_client(config)?);

    // Genre names are decoration; a failed fetch degrades the display,
    // nothing more.
    let genres = GenreDirectory::fetch(&client)
        .await
        .unwrap_or_default();

    let mut coordinator: PaginationCoordinator<Movie> =
        PaginationCoordinator::new(client.clone(), ListingQuery::top_rated());

    coordinator.load_first_page().await?;
    while coordinator.can_paginate()
        && coordinator.state().is_some_and(|state| state.page_number() < pages)
    {
        if !coordinator.load_next_page().await {
            break;
        }
    }

    if let Some(state) = coordinator.state() {
        println!(
            "Top rated - page {} of {}, {} titles",
            state.page_number(),
            state.total_pages(),
            state.total_results()
        );
        println!();
        common::print_listing(state.items(), &genres);
    }

    Ok(())
}
