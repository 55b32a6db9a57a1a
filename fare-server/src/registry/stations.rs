//! Station registry.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DistanceMarker, NewStation, Station, StationKey};
use crate::error::FareError;
use crate::store::StationStore;

/// Registry of stations, unique by name.
#[derive(Clone)]
pub struct StationRegistry {
    store: Arc<dyn StationStore>,
}

impl StationRegistry {
    pub fn new(store: Arc<dyn StationStore>) -> Self {
        Self { store }
    }

    /// Register a new station.
    ///
    /// Fails with `Conflict` if the name is taken; the existing station
    /// keeps its attributes.
    pub async fn register(&self, station: NewStation) -> Result<Station, FareError> {
        let name = station.name.clone();
        let station = self
            .store
            .insert_station(station)
            .await?
            .ok_or_else(|| FareError::Conflict(format!("station {name} already exists")))?;

        info!(id = %station.id, name = %station.name, "station registered");
        Ok(station)
    }

    /// Look up a station by id or name.
    pub async fn resolve(&self, key: &StationKey) -> Result<Option<Station>, FareError> {
        let station = match key {
            StationKey::Id(id) => self.store.station_by_id(*id).await?,
            StationKey::Name(name) => self.store.station_by_name(name).await?,
        };
        Ok(station)
    }

    /// Look up a station, failing with `MissingStation` if absent.
    pub async fn require(&self, key: &StationKey) -> Result<Station, FareError> {
        self.resolve(key)
            .await?
            .ok_or_else(|| FareError::MissingStation(key.clone()))
    }

    pub async fn exists(&self, key: &StationKey) -> Result<bool, FareError> {
        Ok(self.resolve(key).await?.is_some())
    }

    /// The distance marker of a station.
    ///
    /// `MissingStation` if the station is unknown, `MissingDistance` if it
    /// was registered without a marker.
    pub async fn resolve_distance(&self, key: &StationKey) -> Result<DistanceMarker, FareError> {
        let (_, km) = self.require_marked(key).await?;
        Ok(km)
    }

    /// Look up a station together with its distance marker.
    pub async fn require_marked(
        &self,
        key: &StationKey,
    ) -> Result<(Station, DistanceMarker), FareError> {
        let station = self.require(key).await?;
        let km = station
            .distance
            .ok_or_else(|| FareError::MissingDistance(key.clone()))?;
        Ok((station, km))
    }

    /// All stations in registration order.
    pub async fn stations(&self) -> Result<Vec<Station>, FareError> {
        Ok(self.store.stations().await?)
    }
}
