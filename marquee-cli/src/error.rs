//! CLI error types.

use std::fmt;

use marquee::api::TransportError;

/// Errors surfaced to the terminal user.
#[derive(Debug)]
pub enum CliError {
    /// Configuration problem the user must fix.
    Config(String),

    /// The catalog API request failed.
    Api(TransportError),

    /// A media asset could not be produced.
    Media(String),

    /// Local filesystem failure.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Api(e) => write!(f, "API request failed: {}", e),
            CliError::Media(msg) => write!(f, "Media error: {}", msg),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Api(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Config(_) | CliError::Media(_) => None,
        }
    }
}

impl From<TransportError> for CliError {
    fn from(e: TransportError) -> Self {
        CliError::Api(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
