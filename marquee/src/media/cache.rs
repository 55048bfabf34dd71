//! Concurrent, keyed cache of decoded media assets.
//!
//! The cache memoizes [`Asset`]s by canonical URL. Reads are lock-free and
//! concurrent; writes are serialized against each other by the underlying
//! `moka::future::Cache`, and a stored entry is always fully decoded -
//! there is no partial state a reader can observe.
//!
//! `get_asset` is the cache-aside composite: lookup, fetch on miss, store,
//! return. Concurrent misses for the same key coalesce onto one in-flight
//! fetch; the leader performs the download and fans the result out to
//! every follower over a broadcast channel.
//!
//! Eviction is moka's business. Entries can disappear at any time under
//! memory pressure, so absence is never an error - the fetch path is the
//! permanent fallback. [`clear`](MediaCache::clear) drops everything at
//! once and is meant to be wired to the host's low-memory signal.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::future::Cache as MokaCache;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::asset::Asset;
use super::fetcher::AssetFetcher;

/// Default capacity: 256 MB of decoded pixels.
const DEFAULT_MAX_BYTES: u64 = 256 * 1024 * 1024;

/// Configuration for the media cache.
#[derive(Debug, Clone)]
pub struct MediaCacheConfig {
    /// Maximum total decoded size in bytes.
    pub max_bytes: u64,
}

impl Default for MediaCacheConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Misses that attached to an already in-flight fetch.
    pub coalesced: u64,
    pub entries: u64,
    pub weighted_bytes: u64,
}

/// Keyed in-memory store of decoded assets with request coalescing.
///
/// Construct one per process and share it as an `Arc` handle; every
/// component that renders remote images receives the same instance.
pub struct MediaCache {
    assets: MokaCache<String, Asset>,
    fetcher: Arc<dyn AssetFetcher>,
    in_flight: Mutex<HashMap<String, broadcast::Sender<Option<Asset>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
}

impl MediaCache {
    pub fn new(fetcher: Arc<dyn AssetFetcher>, config: MediaCacheConfig) -> Self {
        let assets = MokaCache::builder()
            .weigher(|_key: &String, asset: &Asset| {
                asset.byte_estimate().min(u32::MAX as usize) as u32
            })
            .max_capacity(config.max_bytes)
            .build();

        Self {
            assets,
            fetcher,
            in_flight: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
        }
    }

    /// Non-mutating read. Any number of callers may look up concurrently.
    pub async fn lookup(&self, key: &str) -> Option<Asset> {
        self.assets.get(key).await
    }

    /// Store a decoded asset. Once this returns, every subsequent lookup
    /// observes the value until it is overwritten or the cache is cleared.
    pub async fn store(&self, key: impl Into<String>, asset: Asset) {
        self.assets.insert(key.into(), asset).await;
        self.assets.run_pending_tasks().await;
    }

    /// Drop every entry. Wired to the host's low-memory signal.
    pub fn clear(&self) {
        self.assets.invalidate_all();
        debug!("media cache cleared");
    }

    /// Cache-aside fetch of one asset.
    ///
    /// Returns `None` only when the underlying fetch or decode failed;
    /// the failure is swallowed here and a later call for the same key
    /// retries from scratch.
    pub async fn get_asset(&self, key: &str) -> Option<Asset> {
        if let Some(asset) = self.assets.get(key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Some(asset);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        match self.register(key) {
            FetchSlot::Follower(mut rx) => {
                self.coalesced.fetch_add(1, Ordering::Relaxed);
                debug!(key, "coalescing onto in-flight fetch");
                match rx.recv().await {
                    Ok(result) => result,
                    // Leader vanished without completing; re-read as best
                    // effort.
                    Err(_) => self.assets.get(key).await,
                }
            }
            FetchSlot::Leader(guard) => {
                // The previous leader may have stored between our lookup
                // and registration.
                if let Some(asset) = self.assets.get(key).await {
                    guard.complete(Some(asset.clone()));
                    return Some(asset);
                }

                let result = match self.fetcher.fetch_asset(key).await {
                    Ok(asset) => {
                        self.store(key.to_string(), asset.clone()).await;
                        Some(asset)
                    }
                    Err(err) => {
                        warn!(key, error = %err, "asset fetch failed");
                        None
                    }
                };
                guard.complete(result.clone());
                result
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            entries: self.assets.entry_count(),
            weighted_bytes: self.assets.weighted_size(),
        }
    }

    /// Claim the in-flight slot for a key, or attach to the existing one.
    fn register(&self, key: &str) -> FetchSlot<'_> {
        let mut in_flight = self.in_flight.lock();
        if let Some(sender) = in_flight.get(key) {
            FetchSlot::Follower(sender.subscribe())
        } else {
            let (sender, _) = broadcast::channel(1);
            in_flight.insert(key.to_string(), sender);
            FetchSlot::Leader(InFlightGuard {
                cache: self,
                key: key.to_string(),
                done: false,
            })
        }
    }
}

/// Outcome of claiming the in-flight slot for a key.
enum FetchSlot<'a> {
    /// First requester: performs the fetch and completes the slot.
    Leader(InFlightGuard<'a>),
    /// A fetch is already running; wait for its result.
    Follower(broadcast::Receiver<Option<Asset>>),
}

/// Held by the leader while its fetch runs.
struct InFlightGuard<'a> {
    cache: &'a MediaCache,
    key: String,
    done: bool,
}

impl InFlightGuard<'_> {
    /// Publish the fetch outcome to every follower and release the slot.
    fn complete(mut self, result: Option<Asset>) {
        self.done = true;
        if let Some(sender) = self.cache.in_flight.lock().remove(&self.key) {
            let _ = sender.send(result);
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            // Leader dropped mid-fetch. Removing the entry closes the
            // channel, so followers fall back to a lookup instead of
            // waiting forever.
            self.cache.in_flight.lock().remove(&self.key);
        }
    }
}
