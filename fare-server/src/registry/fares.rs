//! Fare table with a lookup cache.
//!
//! Fare rows are immutable once written, so a cached hit can never go
//! stale. Misses are not cached: a pair registered later must become
//! visible to the next lookup.

use std::sync::Arc;

use moka::future::Cache as MokaCache;
use tracing::info;

use crate::domain::{Cost, FareEntry, Station, StationId};
use crate::error::FareError;
use crate::store::FareStore;

/// Configuration for the fare lookup cache.
#[derive(Debug, Clone)]
pub struct FareCacheConfig {
    /// Maximum number of cached pairs.
    pub max_capacity: u64,
}

impl Default for FareCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

/// Registry of per-ordered-pair costs.
#[derive(Clone)]
pub struct FareTable {
    store: Arc<dyn FareStore>,
    cache: MokaCache<(StationId, StationId), Cost>,
}

impl FareTable {
    pub fn new(store: Arc<dyn FareStore>, config: &FareCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .build();
        Self { store, cache }
    }

    /// Register the cost of travelling `from → to`.
    ///
    /// Add-only: a second registration for the same ordered pair is a
    /// `Conflict`, never an update.
    pub async fn register(
        &self,
        from: &Station,
        to: &Station,
        cost: Cost,
    ) -> Result<FareEntry, FareError> {
        if from.id == to.id {
            return Err(FareError::InvalidInput(format!(
                "fare endpoints must differ (got {} twice)",
                from.name
            )));
        }

        let entry = self
            .store
            .insert_fare(from.id, to.id, cost)
            .await?
            .ok_or_else(|| {
                FareError::Conflict(format!(
                    "fare {} → {} already registered",
                    from.name, to.name
                ))
            })?;

        self.cache.insert(entry.pair(), entry.cost).await;
        info!(from = %from.name, to = %to.name, cost = %cost, "fare registered");
        Ok(entry)
    }

    /// Exact ordered-pair lookup. The reverse pair is never consulted.
    pub async fn lookup(&self, from: StationId, to: StationId) -> Result<Option<Cost>, FareError> {
        if let Some(cost) = self.cache.get(&(from, to)).await {
            return Ok(Some(cost));
        }

        let Some(entry) = self.store.fare(from, to).await? else {
            return Ok(None);
        };

        self.cache.insert(entry.pair(), entry.cost).await;
        Ok(Some(entry.cost))
    }
}
