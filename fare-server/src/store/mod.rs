//! Persistent store collaborator.
//!
//! The registries talk to storage through three narrow traits, one per
//! table. Each offers insert-if-absent (returning `None` when the unique
//! key already exists) and keyed selects. There is no update or delete.
//!
//! Two backends are provided: [`MemoryStore`] for ephemeral deployments
//! and tests, and [`JsonFileStore`], which persists a snapshot to disk
//! after every successful insert.

mod error;
mod file;
mod memory;
mod tables;

use async_trait::async_trait;

use crate::domain::{
    Cost, FareEntry, NewStation, RouteKey, RouteRecord, Station, StationId, StationName,
};

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Station table: unique on name.
#[async_trait]
pub trait StationStore: Send + Sync {
    /// Insert a station, or return `None` if the name is taken.
    async fn insert_station(&self, station: NewStation) -> Result<Option<Station>, StoreError>;

    async fn station_by_id(&self, id: StationId) -> Result<Option<Station>, StoreError>;

    async fn station_by_name(&self, name: &StationName) -> Result<Option<Station>, StoreError>;

    /// All stations in registration order.
    async fn stations(&self) -> Result<Vec<Station>, StoreError>;
}

/// Fare table: unique on the ordered (from, to) pair.
#[async_trait]
pub trait FareStore: Send + Sync {
    /// Insert a fare, or return `None` if the pair already has one.
    async fn insert_fare(
        &self,
        from: StationId,
        to: StationId,
        cost: Cost,
    ) -> Result<Option<FareEntry>, StoreError>;

    /// Exact ordered-pair lookup.
    async fn fare(&self, from: StationId, to: StationId) -> Result<Option<FareEntry>, StoreError>;
}

/// Route table: unique on (from, to, via) including via order.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Insert a route, or return `None` if the exact tuple exists.
    async fn insert_route(&self, key: RouteKey) -> Result<Option<RouteRecord>, StoreError>;

    async fn route(&self, key: &RouteKey) -> Result<Option<RouteRecord>, StoreError>;
}

/// A backend implementing all three tables.
pub trait Store: StationStore + FareStore + RouteStore {}

impl<T: StationStore + FareStore + RouteStore> Store for T {}
