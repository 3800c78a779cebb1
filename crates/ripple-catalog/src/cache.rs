//! Explicit per-resource cache of in-flight and completed fetches.
//!
//! Concurrent callers asking for the same key share one fetch. A failed fetch
//! is evicted once it settles so the next caller retries; successful results
//! stay until [`CatalogCache::invalidate`] or [`CatalogCache::clear`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};

use ripple_core::error::CatalogError;

type SharedFetch<T> = Shared<BoxFuture<'static, Result<Arc<T>, CatalogError>>>;

pub struct CatalogCache<T> {
    entries: Mutex<HashMap<String, SharedFetch<T>>>,
}

impl<T> Default for CatalogCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Send + Sync + 'static> CatalogCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, SharedFetch<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached value for `key`, starting `fetch` if nothing is
    /// cached or in flight.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Arc<T>, CatalogError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CatalogError>> + Send + 'static,
    {
        let shared = {
            let mut entries = self.entries();
            entries
                .entry(key.to_string())
                .or_insert_with(|| {
                    tracing::debug!(key, "catalog cache miss");
                    fetch().map(|result| result.map(Arc::new)).boxed().shared()
                })
                .clone()
        };

        let result = shared.clone().await;
        if result.is_err() {
            let mut entries = self.entries();
            // A newer fetch may already have replaced the failed one.
            if entries.get(key).is_some_and(|current| current.ptr_eq(&shared)) {
                entries.remove(key);
            }
        }
        result
    }

    /// The completed, successful value for `key`, if any.
    pub fn peek(&self, key: &str) -> Option<Arc<T>> {
        self.entries()
            .get(key)
            .and_then(|fetch| fetch.peek().cloned())
            .and_then(Result::ok)
    }

    /// Drop `key`; returns whether it was present.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
