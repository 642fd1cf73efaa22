//! Cache-fronted list fetching.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::cache::ExpiringCache;

use super::{Bucket, CatalogClient, ItemSummary};

/// Retrieves bucket result lists, consulting and populating the cache.
///
/// Fails soft: any transport error, non-2xx status, or malformed body is
/// logged and surfaced as `None`, never propagated to the caller.
pub struct CatalogFetcher {
    client: Arc<CatalogClient>,
    cache: ExpiringCache<ItemSummary>,
}

impl CatalogFetcher {
    /// Create a fetcher whose cache entries stay fresh for `ttl`.
    pub fn new(client: Arc<CatalogClient>, ttl: Duration) -> Self {
        Self {
            client,
            cache: ExpiringCache::new(ttl),
        }
    }

    /// Fetch the result list for `bucket`, from cache when fresh.
    pub async fn fetch(&self, bucket: Bucket) -> Option<Vec<ItemSummary>> {
        let client = self.client.clone();
        let result = self
            .cache
            .get_or_populate(bucket.name(), || async move {
                client.list(bucket.path()).await
            })
            .await;

        match result {
            Ok(items) => Some(items),
            Err(e) => {
                warn!(bucket = bucket.name(), error = %e, "catalog fetch failed");
                None
            }
        }
    }
}
