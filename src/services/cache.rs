//! Process-wide query cache
//!
//! Results are stored under semantic keys such as `["books", "dune"]`. The
//! cache exposes exactly two operations to the rest of the front end:
//! [`QueryCache::fetch_or_reuse`] and [`QueryCache::invalidate_prefix`].
//! There is no eviction: every distinct key keeps its entry until the
//! process exits.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt;
use std::future::Future;
use tokio::sync::RwLock;

use crate::error::AppResult;

/// Hierarchical cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Key of the book search for an active query
    pub fn books(active_query: &str) -> Self {
        Self::new(["books", active_query])
    }

    /// Prefix covering every book search
    pub fn all_books() -> Self {
        Self::new(["books"])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, segment) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", segment)?;
        }
        write!(f, "]")
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: DateTime<Utc>,
    stale: bool,
}

struct Store<V> {
    entries: IndexMap<QueryKey, CacheEntry<V>>,
    /// Bumped on every invalidation so fetches that straddle one land stale
    epoch: u64,
}

/// Key-to-result store shared by every view
pub struct QueryCache<V> {
    store: RwLock<Store<V>>,
}

impl<V: Clone + Send + Sync> QueryCache<V> {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store {
                entries: IndexMap::new(),
                epoch: 0,
            }),
        }
    }

    /// Return the fresh entry for `key`, or run `fetch` and store its result.
    ///
    /// Failed fetches are not cached; a stale entry stays in place until a
    /// fetch for its key succeeds.
    pub async fn fetch_or_reuse<F, Fut>(&self, key: &QueryKey, fetch: F) -> AppResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<V>>,
    {
        let started_epoch = {
            let store = self.store.read().await;
            if let Some(entry) = store.entries.get(key) {
                if !entry.stale {
                    tracing::debug!("Cache hit for {} (fetched at {})", key, entry.fetched_at);
                    return Ok(entry.value.clone());
                }
                tracing::debug!("Cache entry for {} is stale, refetching", key);
            } else {
                tracing::debug!("Cache miss for {}", key);
            }
            store.epoch
        };

        let value = fetch().await?;

        let mut store = self.store.write().await;
        let stale = store.epoch != started_epoch;
        if stale {
            tracing::debug!("Invalidation raced the fetch for {}, storing it as stale", key);
        }
        store.entries.insert(
            key.clone(),
            CacheEntry {
                value: value.clone(),
                fetched_at: Utc::now(),
                stale,
            },
        );
        Ok(value)
    }

    /// Mark every entry under `prefix` stale. Returns how many entries matched.
    pub async fn invalidate_prefix(&self, prefix: &QueryKey) -> usize {
        let mut store = self.store.write().await;
        store.epoch += 1;

        let mut matched = 0;
        for (key, entry) in store.entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                matched += 1;
            }
        }

        tracing::info!("Invalidated {} cache entries under {}", matched, prefix);
        matched
    }

    /// Last stored value for `key`, fresh or not
    pub async fn peek(&self, key: &QueryKey) -> Option<V> {
        self.store
            .read()
            .await
            .entries
            .get(key)
            .map(|entry| entry.value.clone())
    }

    pub async fn is_fresh(&self, key: &QueryKey) -> bool {
        self.store
            .read()
            .await
            .entries
            .get(key)
            .map(|entry| !entry.stale)
            .unwrap_or(false)
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V: Clone + Send + Sync> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
