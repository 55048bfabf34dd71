//! Error types for the data-source boundary.
//!
//! Two families cover everything the remote API can do to us:
//!
//! - [`TransportError`] - the request never produced a usable envelope
//!   (connection failure, non-success status, undecodable payload).
//! - [`DecodeError`] - bytes arrived but could not be turned into a value.
//!   This covers both JSON payloads and image bytes, so the media module
//!   reuses it for asset decoding.

use thiserror::Error;

/// Errors from executing a request against the remote catalog API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed mid-flight.
    #[error("request failed: {0}")]
    Network(String),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The request URL could not be constructed.
    #[error("invalid request URL: {0}")]
    Url(String),

    /// The response body was not a valid envelope.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors turning response bytes into a usable value.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload was not the JSON shape we asked for.
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The bytes were not a decodable image.
    #[error("undecodable image bytes: {0}")]
    Image(#[from] image::ImageError),
}
