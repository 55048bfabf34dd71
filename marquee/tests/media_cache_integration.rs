//! Integration tests for the media cache.
//!
//! These tests exercise the cache across real task boundaries:
//! - many concurrent readers coalescing onto one fetch
//! - independent keys fetching independently
//! - clear-and-refetch under concurrent use
//!
//! Run with: `cargo test --test media_cache_integration`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{DynamicImage, Rgba, RgbaImage};

use marquee::api::BoxFuture;
use marquee::media::{Asset, AssetFetcher, FetchError, MediaCache, MediaCacheConfig};

// ============================================================================
// Helper Functions
// ============================================================================

/// Deterministic pixels per URL, so content equality proves which fetch
/// produced an asset.
fn asset_for(url: &str) -> Asset {
    let value = url.bytes().fold(0u8, u8::wrapping_add);
    Asset::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        2,
        2,
        Rgba([value, value, value, 255]),
    )))
}

/// Fetcher that synthesizes an asset per URL after a short delay, counting
/// every fetch it performs.
struct CountingFetcher {
    delay: Duration,
    calls: AtomicUsize,
}

impl CountingFetcher {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AssetFetcher for CountingFetcher {
    fn fetch_asset<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Asset, FetchError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            Ok(asset_for(url))
        })
    }
}

fn make_cache(fetcher: Arc<CountingFetcher>) -> Arc<MediaCache> {
    Arc::new(MediaCache::new(fetcher, MediaCacheConfig::default()))
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Eight tasks race for one uncached key; one fetch happens and every task
/// receives the content-equal asset.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_readers_coalesce_onto_one_fetch() {
    let fetcher = Arc::new(CountingFetcher::new(Duration::from_millis(30)));
    let cache = make_cache(fetcher.clone());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move { cache.get_asset("poster/u1").await }));
    }

    let expected = asset_for("poster/u1");
    for result in futures::future::join_all(handles).await {
        let asset = result.expect("task completes");
        assert_eq!(asset, Some(expected.clone()));
    }

    assert_eq!(fetcher.calls(), 1, "coalescing must collapse to one fetch");
    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 8);
    assert!(stats.coalesced >= 1, "followers should have attached");
}

/// Distinct keys never share a fetch.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_keys_fetch_independently() {
    let fetcher = Arc::new(CountingFetcher::new(Duration::from_millis(10)));
    let cache = make_cache(fetcher.clone());

    let mut handles = Vec::new();
    for key in ["poster/a", "poster/b", "poster/c"] {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            (key, cache.get_asset(key).await)
        }));
    }

    for result in futures::future::join_all(handles).await {
        let (key, asset) = result.expect("task completes");
        assert_eq!(asset, Some(asset_for(key)));
    }

    assert_eq!(fetcher.calls(), 3);
}

/// Clearing under load is safe: entries vanish, later requests refetch.
#[tokio::test]
async fn test_clear_then_refetch() {
    let fetcher = Arc::new(CountingFetcher::new(Duration::from_millis(1)));
    let cache = make_cache(fetcher.clone());

    assert!(cache.get_asset("poster/u1").await.is_some());
    assert_eq!(fetcher.calls(), 1);

    // Low-memory signal.
    cache.clear();
    assert_eq!(cache.lookup("poster/u1").await, None);

    // Absence is not an error; the fallback fetch path restores the entry.
    assert!(cache.get_asset("poster/u1").await.is_some());
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(cache.lookup("poster/u1").await, Some(asset_for("poster/u1")));
}

/// A second wave of readers after completion is served purely from cache.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_second_wave_hits_cache() {
    let fetcher = Arc::new(CountingFetcher::new(Duration::from_millis(10)));
    let cache = make_cache(fetcher.clone());

    cache.get_asset("poster/u1").await.expect("first fetch");

    let mut handles = Vec::new();
    for _ in 0..4 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move { cache.get_asset("poster/u1").await }));
    }
    for handle in handles {
        assert!(handle.await.expect("task completes").is_some());
    }

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(cache.stats().hits, 4);
}
