//! Config command - show the resolved configuration.

use marquee::config::{format_size, ConfigFile};

use crate::error::CliError;

/// Run the config command.
pub fn run(config: &ConfigFile) -> Result<(), CliError> {
    match ConfigFile::config_path() {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (absent, using defaults)", path.display()),
        None => println!("Config file: <no config directory on this platform>"),
    }
    println!();

    println!("[api]");
    println!("base_url = {}", config.api.base_url);
    println!(
        "api_key = {}",
        if config.api.api_key.is_empty() {
            "<unset>"
        } else {
            "<set>"
        }
    );
    println!(
        "language = {}",
        config.api.language.as_deref().unwrap_or("<unset>")
    );
    println!();

    println!("[images]");
    println!("base_url = {}", config.images.base_url);
    println!("poster_size = {}", config.images.poster_size);
    println!("backdrop_size = {}", config.images.backdrop_size);
    println!();

    println!("[cache]");
    println!("memory_size = {}", format_size(config.cache.memory_size));
    println!();

    println!("[log]");
    match &config.log.directory {
        Some(directory) => println!("directory = {}", directory.display()),
        None => println!("directory = <stderr>"),
    }

    Ok(())
}
