//! TTL caches behind the data tools
//!
//! Each cache holds one kind of value (quotes, key statistics, rendered news)
//! keyed by a normalized subject such as an uppercase ticker or a lowercase
//! query. Only successful fetches are stored.

use cached::{Cached, TimedCache};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared, clonable TTL cache
#[derive(Clone)]
pub struct StockCache<V> {
    kind: &'static str,
    entries: Arc<RwLock<TimedCache<String, V>>>,
}

impl<V: Clone> StockCache<V> {
    /// `kind` only labels log lines
    pub fn new(kind: &'static str, ttl: Duration) -> Self {
        Self {
            kind,
            entries: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Cached value for `subject`, or the result of `fetch`
    ///
    /// A failed fetch is returned as-is and leaves the cache untouched, so
    /// the next call tries again.
    pub async fn get_or_fetch<F, Fut, E>(&self, subject: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        // TimedCache evicts on read, hence the write lock
        if let Some(hit) = self.entries.write().await.cache_get(subject).cloned() {
            debug!(kind = self.kind, subject, "Cache hit");
            return Ok(hit);
        }

        debug!(kind = self.kind, subject, "Cache miss");
        let value = fetch().await?;
        self.entries
            .write()
            .await
            .cache_set(subject.to_string(), value.clone());
        Ok(value)
    }

    /// Entries stored, including ones that expired but were not read since
    pub async fn len(&self) -> usize {
        self.entries.read().await.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
