//! Caching layer for location lookups.
//!
//! Suggestions for a given query and city change rarely, and the demo flow
//! and typical UIs look the same place up repeatedly while a user types.
//! Route searches depend on the clock and realtime data and are never
//! cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde_json::Value;

use crate::jakdojade::{DEFAULT_CITY_SYMBOL, JakdojadeClient, JakdojadeError};

/// Cache key for location lookups: (trimmed query, city symbol).
type LocationKey = (String, String);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 500,
        }
    }
}

fn location_key(query: &str, city_symbol: Option<&str>) -> LocationKey {
    (
        query.trim().to_string(),
        city_symbol.unwrap_or(DEFAULT_CITY_SYMBOL).to_string(),
    )
}

/// Jakdojade client with cached location lookups.
///
/// Wraps a `JakdojadeClient`; everything other than location lookups goes
/// through [`CachedJakdojadeClient::client`].
pub struct CachedJakdojadeClient {
    client: JakdojadeClient,
    locations: MokaCache<LocationKey, Arc<Value>>,
}

impl CachedJakdojadeClient {
    /// Create a new cached client.
    pub fn new(client: JakdojadeClient, cache_config: &CacheConfig) -> Self {
        let locations = MokaCache::builder()
            .time_to_live(cache_config.ttl)
            .max_capacity(cache_config.max_capacity)
            .build();

        Self { client, locations }
    }

    /// Look up locations, using the cache if available.
    ///
    /// Failed lookups are not cached.
    pub async fn location_search(
        &self,
        query: &str,
        city_symbol: Option<&str>,
    ) -> Result<Arc<Value>, JakdojadeError> {
        let key = location_key(query, city_symbol);

        if let Some(cached) = self.locations.get(&key).await {
            return Ok(cached);
        }

        let found = Arc::new(self.client.location_search(query, city_symbol).await?);
        self.locations.insert(key, found.clone()).await;

        Ok(found)
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &JakdojadeClient {
        &self.client
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.locations.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.locations.invalidate_all();
    }
}
