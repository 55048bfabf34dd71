//! Application configuration.
//!
//! Settings come from `<config dir>/marquee/config.ini`, with every value
//! defaulted so a missing file or missing key is never an error. Sections:
//!
//! ```ini
//! [api]
//! base_url = https://api.themoviedb.org/3
//! api_key = <your key>
//! language = en-US
//!
//! [images]
//! base_url = https://image.tmdb.org/t/p
//! poster_size = w185
//! backdrop_size = w1280
//!
//! [cache]
//! memory_size = 256MB
//!
//! [log]
//! directory = /var/log/marquee
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

/// Default catalog API endpoint.
const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default image CDN endpoint.
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Default memory cache capacity for decoded images.
const DEFAULT_CACHE_MEMORY_SIZE: u64 = 256 * 1024 * 1024;

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },
}

/// Catalog API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: String,
    /// Optional `language` query parameter sent with every request.
    pub language: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: String::new(),
            language: None,
        }
    }
}

/// Image CDN settings and URL construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
    pub base_url: String,
    pub poster_size: String,
    pub backdrop_size: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            poster_size: "w185".to_string(),
            backdrop_size: "w1280".to_string(),
        }
    }
}

impl ImageSettings {
    /// Full URL for a listing poster path.
    pub fn poster_url(&self, poster_path: &str) -> String {
        self.sized_url(&self.poster_size, poster_path)
    }

    /// Full URL for a detail backdrop path.
    pub fn backdrop_url(&self, backdrop_path: &str) -> String {
        self.sized_url(&self.backdrop_size, backdrop_path)
    }

    fn sized_url(&self, size: &str, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            size,
            path.trim_start_matches('/')
        )
    }
}

/// Media cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Memory cache capacity in bytes.
    pub memory_size: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_CACHE_MEMORY_SIZE,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogSettings {
    /// Directory for rotated log files; stderr when unset.
    pub directory: Option<PathBuf>,
}

/// The full configuration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub api: ApiSettings,
    pub images: ImageSettings,
    pub cache: CacheSettings,
    pub log: LogSettings,
}

impl ConfigFile {
    /// Platform config file location, e.g.
    /// `~/.config/marquee/config.ini` on Linux.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("marquee").join("config.ini"))
    }

    /// Load the config file from its standard location. A missing file
    /// yields the defaults; a present but unreadable file is an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load a config file from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config = Self::default();

        if let Some(section) = ini.section(Some("api")) {
            if let Some(value) = section.get("base_url") {
                config.api.base_url = value.to_string();
            }
            if let Some(value) = section.get("api_key") {
                config.api.api_key = value.to_string();
            }
            if let Some(value) = section.get("language") {
                if !value.is_empty() {
                    config.api.language = Some(value.to_string());
                }
            }
        }

        if let Some(section) = ini.section(Some("images")) {
            if let Some(value) = section.get("base_url") {
                config.images.base_url = value.to_string();
            }
            if let Some(value) = section.get("poster_size") {
                config.images.poster_size = value.to_string();
            }
            if let Some(value) = section.get("backdrop_size") {
                config.images.backdrop_size = value.to_string();
            }
        }

        if let Some(section) = ini.section(Some("cache")) {
            if let Some(value) = section.get("memory_size") {
                if let Some(bytes) = parse_size(value) {
                    config.cache.memory_size = bytes;
                }
            }
        }

        if let Some(section) = ini.section(Some("log")) {
            if let Some(value) = section.get("directory") {
                if !value.is_empty() {
                    config.log.directory = Some(PathBuf::from(value));
                }
            }
        }

        Ok(config)
    }
}

/// Parse a human size: plain bytes or a KB/MB/GB suffix.
pub fn parse_size(value: &str) -> Option<u64> {
    let value = value.trim().to_uppercase();
    let (number, multiplier) = if let Some(stripped) = value.strip_suffix("GB") {
        (stripped, 1024 * 1024 * 1024)
    } else if let Some(stripped) = value.strip_suffix("MB") {
        (stripped, 1024 * 1024)
    } else if let Some(stripped) = value.strip_suffix("KB") {
        (stripped, 1024)
    } else {
        (value.as_str(), 1)
    };
    number.trim().parse::<u64>().ok().map(|n| n * multiplier)
}

/// Render a byte count for display.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
