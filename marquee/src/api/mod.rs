//! Boundary with the remote catalog API.
//!
//! This module owns the transport seam: typed request descriptors, the
//! reqwest-backed [`ApiClient`], and the [`PageSource`] trait that the
//! pagination coordinator consumes. Everything above it works in terms of
//! decoded envelopes and never sees HTTP details.

mod client;
mod error;
mod request;

pub use client::{ApiClient, BoxFuture, PageSource};
pub use error::{DecodeError, TransportError};
pub use request::{ApiRequest, ListingQuery, Method};

#[cfg(test)]
pub use client::tests::MockPageSource;
