//! Marquee - catalog browsing core for paged media listings.
//!
//! This library carries the two subsystems with real engineering risk in a
//! catalog browser, and the boundaries they need:
//!
//! - [`media`] - a concurrent, keyed cache of decoded remote images with
//!   cache-aside fetching and per-key request coalescing.
//! - [`listing`] - a pagination coordinator owning one listing's state:
//!   first load, guarded infinite scroll, wholesale-replace refresh, and
//!   ad-hoc search with stale-response protection.
//! - [`api`] - the typed boundary with the remote paged-listing API.
//! - [`model`] - the wire models those listings carry.
//!
//! Presentation layers stay thin: they drive a coordinator, render from
//! its snapshot accessors, and resolve images through the media cache.

pub mod api;
pub mod config;
pub mod listing;
pub mod logging;
pub mod media;
pub mod model;

/// Crate version, for banners and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
