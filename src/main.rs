//! Simple LRU Cache demo
//!
//! Runs a multi-threaded memoization workload against the configured cache
//! strategy and reports how often the slow fallback actually ran.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use simple_lru_cache::{Config, ConcurrentLruCache, LruCache, Strategy, SynchronizedLruCache};

const WORKER_THREADS: u64 = 8;
const LOOKUPS_PER_THREAD: u64 = 200;
const KEY_SPACE: u64 = 64;

/// Entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache for the configured strategy
/// 4. Run the workload and log a summary
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simple_lru_cache=info,lru_cache_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, default_ttl={}ms, initial_capacity={}, strategy={:?}",
        config.capacity, config.default_ttl_ms, config.initial_capacity, config.strategy
    );

    match config.strategy {
        Strategy::Synchronized => {
            let cache: SynchronizedLruCache<u64, u64> =
                SynchronizedLruCache::from_config(&config).context("invalid cache config")?;
            run_workload(&cache)
        }
        Strategy::Concurrent => {
            let cache: ConcurrentLruCache<u64, u64> =
                ConcurrentLruCache::from_config(&config).context("invalid cache config")?;
            run_workload(&cache)
        }
    }
}

/// Hammers the cache from several threads with `get_or_compute`.
fn run_workload<C>(cache: &C) -> anyhow::Result<()>
where
    C: LruCache<u64, u64> + Sync,
{
    let computations = AtomicUsize::new(0);
    let started = Instant::now();

    thread::scope(|scope| -> anyhow::Result<()> {
        let workers: Vec<_> = (0..WORKER_THREADS)
            .map(|worker| {
                let computations = &computations;
                scope.spawn(move || -> anyhow::Result<()> {
                    for i in 0..LOOKUPS_PER_THREAD {
                        let key = (worker * 7 + i * 13) % KEY_SPACE;
                        cache.get_or_compute(key, || {
                            computations.fetch_add(1, Ordering::Relaxed);
                            slow_square(key)
                        })?;
                    }
                    Ok(())
                })
            })
            .collect();

        for worker in workers {
            worker
                .join()
                .map_err(|_| anyhow::anyhow!("worker thread panicked"))??;
        }
        Ok(())
    })?;

    let lookups = WORKER_THREADS * LOOKUPS_PER_THREAD;
    info!(
        "Workload finished in {:?}: lookups={}, fallbacks={}, size={}, capacity={}",
        started.elapsed(),
        lookups,
        computations.load(Ordering::Relaxed),
        cache.size(),
        cache.capacity()
    );

    Ok(())
}

/// Stand-in for an expensive computation.
fn slow_square(n: u64) -> anyhow::Result<u64> {
    thread::sleep(Duration::from_millis(2));
    n.checked_mul(n)
        .ok_or_else(|| anyhow::anyhow!("overflow squaring {}", n))
}
