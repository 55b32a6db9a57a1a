//! Ephemeral in-memory store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    Cost, FareEntry, NewStation, RouteKey, RouteRecord, Station, StationId, StationName,
};

use super::tables::Tables;
use super::{FareStore, RouteStore, StationStore, StoreError};

/// Store backed by process memory. Contents are lost on restart.
///
/// All tables sit behind one lock, so every insert-if-absent is atomic
/// with respect to concurrent registrations.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StationStore for MemoryStore {
    async fn insert_station(&self, station: NewStation) -> Result<Option<Station>, StoreError> {
        self.tables.write().await.insert_station(station)
    }

    async fn station_by_id(&self, id: StationId) -> Result<Option<Station>, StoreError> {
        Ok(self.tables.read().await.station_by_id(id).cloned())
    }

    async fn station_by_name(&self, name: &StationName) -> Result<Option<Station>, StoreError> {
        Ok(self.tables.read().await.station_by_name(name).cloned())
    }

    async fn stations(&self) -> Result<Vec<Station>, StoreError> {
        Ok(self.tables.read().await.stations().to_vec())
    }
}

#[async_trait]
impl FareStore for MemoryStore {
    async fn insert_fare(
        &self,
        from: StationId,
        to: StationId,
        cost: Cost,
    ) -> Result<Option<FareEntry>, StoreError> {
        self.tables.write().await.insert_fare(from, to, cost)
    }

    async fn fare(&self, from: StationId, to: StationId) -> Result<Option<FareEntry>, StoreError> {
        Ok(self.tables.read().await.fare(from, to).cloned())
    }
}

#[async_trait]
impl RouteStore for MemoryStore {
    async fn insert_route(&self, key: RouteKey) -> Result<Option<RouteRecord>, StoreError> {
        self.tables.write().await.insert_route(key)
    }

    async fn route(&self, key: &RouteKey) -> Result<Option<RouteRecord>, StoreError> {
        Ok(self.tables.read().await.route(key).cloned())
    }
}
