//! Error type for asset fetching.

use thiserror::Error;

use crate::api::{DecodeError, TransportError};

/// Anything that can go wrong between a URL and a displayable asset.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
