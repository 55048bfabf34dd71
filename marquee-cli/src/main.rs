//! Marquee CLI - command-line catalog browser.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

mod commands;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(
    name = "marquee",
    version,
    about = "Browse paged movie catalogs from the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the top-rated listing
    Top {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Search titles by free text
    Search {
        /// Query text
        query: String,
    },
    /// Show details and similar titles for one title id
    Details {
        /// Title id
        id: u64,
    },
    /// Download a title's poster image
    Poster {
        /// Title id
        id: u64,
        /// Output image file; format follows the extension
        #[arg(long, default_value = "poster.png")]
        out: PathBuf,
    },
    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match marquee::config::ConfigFile::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let _log_guard = marquee::logging::init(config.log.directory.as_deref());
    debug!(version = marquee::VERSION, "marquee starting");

    let result = match cli.command {
        Command::Top { pages } => commands::top::run(&config, pages).await,
        Command::Search { query } => commands::search::run(&config, &query).await,
        Command::Details { id } => commands::details::run(&config, id).await,
        Command::Poster { id, out } => commands::poster::run(&config, id, &out).await,
        Command::Config => commands::config::run(&config),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
