//! Expiring per-bucket cache for catalog result lists.
//!
//! Each named bucket holds the most recent result set together with an
//! expiry instant. Population happens through [`ExpiringCache::get_or_populate`]:
//! a fresh entry is returned as-is, otherwise the supplied populate function
//! runs and its result (on success) replaces the entry. A failed populate
//! leaves the previous entry untouched.
//!
//! Populations are coalesced per bucket: the bucket lock is held across the
//! populate call, so concurrent cold requesters issue a single upstream
//! request and all observe the winner's result.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::error::Result;

struct BucketState<T> {
    data: Option<Vec<T>>,
    expires_at: Instant,
}

impl<T> BucketState<T> {
    fn empty() -> Self {
        Self {
            data: None,
            expires_at: Instant::now(),
        }
    }

    /// Fresh iff data is present, non-empty, and unexpired.
    fn is_fresh(&self, now: Instant) -> bool {
        self.data.as_ref().is_some_and(|d| !d.is_empty()) && now < self.expires_at
    }
}

/// Time-bounded cache keyed by bucket name.
pub struct ExpiringCache<T> {
    ttl: Duration,
    buckets: DashMap<String, Arc<Mutex<BucketState<T>>>>,
}

impl<T: Clone> ExpiringCache<T> {
    /// Create a cache whose entries stay fresh for `ttl` after population.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            buckets: DashMap::new(),
        }
    }

    fn bucket(&self, name: &str) -> Arc<Mutex<BucketState<T>>> {
        self.buckets
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(BucketState::empty())))
            .clone()
    }

    /// Return the fresh entry for `bucket_name`, or run `populate` to refresh it.
    ///
    /// On populate success the new result is stored with
    /// `expires_at = now + ttl` and returned. On populate failure the
    /// previous entry (data and expiry) is left exactly as it was and the
    /// error is returned to the caller.
    pub async fn get_or_populate<F, Fut>(&self, bucket_name: &str, populate: F) -> Result<Vec<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let bucket = self.bucket(bucket_name);
        let mut state = bucket.lock().await;

        let now = Instant::now();
        if state.is_fresh(now) {
            tracing::debug!(bucket = bucket_name, "cache hit");
            return Ok(state.data.clone().unwrap_or_default());
        }

        let items = populate().await?;
        state.data = Some(items.clone());
        state.expires_at = Instant::now() + self.ttl;
        tracing::debug!(bucket = bucket_name, count = items.len(), "cache refreshed");

        Ok(items)
    }
}
