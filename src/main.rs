//! LRU TTL Cache demo
//!
//! Walks through the construction modes of the cache and prints a
//! statistics snapshot for each one.

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_ttl_cache::{Cache, CacheConfig, CacheStats};

/// Entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Persistent cache with a capacity bound (LRU eviction)
/// 3. Expiring cache (lazy expiry on access)
/// 4. Capacity and expiry combined (background sweep)
/// 5. Large dataset defaults with a batch insert
#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    persistent_demo()?;
    expiry_demo().await?;
    combined_demo().await?;
    large_dataset_demo()?;

    info!("Demo complete");
    Ok(())
}

fn persistent_demo() -> Result<()> {
    let cache = Cache::persistent(Some(2))?;
    cache.insert("key1", "v1");
    cache.insert("key2", "v2");
    cache.insert("key3", "v3");

    info!(
        "persistent: key1={:?} key2={:?} key3={:?}",
        cache.get("key1"),
        cache.get("key2"),
        cache.get("key3")
    );
    report("persistent", &cache.stats())
}

async fn expiry_demo() -> Result<()> {
    let cache = Cache::with_expiry(Duration::from_millis(100))?;
    cache.insert("key1", "v1");
    info!("with_expiry: before TTL key1={:?}", cache.get("key1"));

    tokio::time::sleep(Duration::from_millis(150)).await;

    info!(
        "with_expiry: after TTL key1={:?} contains={}",
        cache.get("key1"),
        cache.contains_key("key1")
    );
    let stats = cache.stats();
    cache.dispose();
    report("with_expiry", &stats)
}

async fn combined_demo() -> Result<()> {
    let config = CacheConfig::with_capacity_and_expiry(3, Duration::from_millis(200))
        .cleanup_interval(Duration::from_millis(250));
    let cache = Cache::new(config)?;

    cache.insert_all((1..=5).map(|i| (format!("user:{i}"), i)));
    info!("combined: {} entries after batch insert", cache.len());

    tokio::time::sleep(Duration::from_millis(300)).await;

    info!(
        "combined: {} entries after background sweep ({} sweeps)",
        cache.len(),
        cache.sweep_count()
    );
    let stats = cache.stats();
    cache.dispose();
    report("combined", &stats)
}

fn large_dataset_demo() -> Result<()> {
    let cache = Cache::large_dataset()?;
    cache.insert_all((0..10_000u64).map(|i| (i, i * i)));
    cache.remove_all(&[0u64, 1, 2]);

    info!(
        "large_dataset: {} entries, 99^2={:?}",
        cache.len(),
        cache.get(&99u64)
    );
    let stats = cache.stats();
    cache.dispose();
    report("large_dataset", &stats)
}

fn report(mode: &str, stats: &CacheStats) -> Result<()> {
    println!("{mode}: {}", serde_json::to_string(stats)?);
    Ok(())
}
