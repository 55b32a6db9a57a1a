//! In-memory tables shared by the store backends.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Cost, FareEntry, NewStation, RouteKey, RouteRecord, Station, StationId, StationName,
};

use super::StoreError;

/// Serialized form of all three tables.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub fares: Vec<FareEntry>,
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
}

/// Row storage plus unique indexes.
///
/// Rows are append-only; each index maps a unique key to a row position.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    stations: Vec<Station>,
    station_by_id: HashMap<StationId, usize>,
    station_by_name: HashMap<StationName, usize>,
    next_station_id: u32,

    fares: Vec<FareEntry>,
    fare_by_pair: HashMap<(StationId, StationId), usize>,
    next_fare_id: u32,

    routes: Vec<RouteRecord>,
    route_by_key: HashMap<RouteKey, usize>,
    next_route_id: u32,
}

fn next_id(current: u32, table: &'static str) -> Result<u32, StoreError> {
    current.checked_add(1).ok_or(StoreError::IdsExhausted(table))
}

impl Tables {
    pub fn new() -> Self {
        Self {
            next_station_id: 1,
            next_fare_id: 1,
            next_route_id: 1,
            ..Self::default()
        }
    }

    /// Rebuild tables and indexes from a snapshot, rejecting duplicates.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let mut tables = Self::new();

        for station in snapshot.stations {
            let pos = tables.stations.len();
            if tables.station_by_id.insert(station.id, pos).is_some() {
                return Err(StoreError::Corrupt(format!(
                    "duplicate station id {}",
                    station.id
                )));
            }
            if tables
                .station_by_name
                .insert(station.name.clone(), pos)
                .is_some()
            {
                return Err(StoreError::Corrupt(format!(
                    "duplicate station name {}",
                    station.name
                )));
            }
            tables.next_station_id = tables
                .next_station_id
                .max(next_id(station.id.0, "stations")?);
            tables.stations.push(station);
        }

        for fare in snapshot.fares {
            let pos = tables.fares.len();
            if tables.fare_by_pair.insert(fare.pair(), pos).is_some() {
                return Err(StoreError::Corrupt(format!(
                    "duplicate fare {} → {}",
                    fare.from, fare.to
                )));
            }
            tables.next_fare_id = tables.next_fare_id.max(next_id(fare.id, "fares")?);
            tables.fares.push(fare);
        }

        for route in snapshot.routes {
            let pos = tables.routes.len();
            if tables.route_by_key.insert(route.key.clone(), pos).is_some() {
                return Err(StoreError::Corrupt(format!(
                    "duplicate route {} → {} via {:?}",
                    route.key.from, route.key.to, route.key.via
                )));
            }
            tables.next_route_id = tables.next_route_id.max(next_id(route.id, "routes")?);
            tables.routes.push(route);
        }

        Ok(tables)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stations: self.stations.clone(),
            fares: self.fares.clone(),
            routes: self.routes.clone(),
        }
    }

    pub fn insert_station(&mut self, new: NewStation) -> Result<Option<Station>, StoreError> {
        let Entry::Vacant(slot) = self.station_by_name.entry(new.name.clone()) else {
            return Ok(None);
        };

        let id = StationId(self.next_station_id);
        let station = Station {
            id,
            name: new.name,
            distance: new.distance,
            registered_at: Utc::now(),
        };
        self.next_station_id = next_id(self.next_station_id, "stations")?;

        let pos = self.stations.len();
        slot.insert(pos);
        self.station_by_id.insert(id, pos);
        self.stations.push(station.clone());
        Ok(Some(station))
    }

    pub fn station_by_id(&self, id: StationId) -> Option<&Station> {
        self.station_by_id.get(&id).map(|&pos| &self.stations[pos])
    }

    pub fn station_by_name(&self, name: &StationName) -> Option<&Station> {
        self.station_by_name.get(name).map(|&pos| &self.stations[pos])
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn insert_fare(
        &mut self,
        from: StationId,
        to: StationId,
        cost: Cost,
    ) -> Result<Option<FareEntry>, StoreError> {
        let Entry::Vacant(slot) = self.fare_by_pair.entry((from, to)) else {
            return Ok(None);
        };

        let fare = FareEntry {
            id: self.next_fare_id,
            from,
            to,
            cost,
            registered_at: Utc::now(),
        };
        self.next_fare_id = next_id(self.next_fare_id, "fares")?;

        slot.insert(self.fares.len());
        self.fares.push(fare.clone());
        Ok(Some(fare))
    }

    pub fn fare(&self, from: StationId, to: StationId) -> Option<&FareEntry> {
        self.fare_by_pair
            .get(&(from, to))
            .map(|&pos| &self.fares[pos])
    }

    pub fn insert_route(&mut self, key: RouteKey) -> Result<Option<RouteRecord>, StoreError> {
        let Entry::Vacant(slot) = self.route_by_key.entry(key.clone()) else {
            return Ok(None);
        };

        let route = RouteRecord {
            id: self.next_route_id,
            key,
            registered_at: Utc::now(),
        };
        self.next_route_id = next_id(self.next_route_id, "routes")?;

        slot.insert(self.routes.len());
        self.routes.push(route.clone());
        Ok(Some(route))
    }

    pub fn route(&self, key: &RouteKey) -> Option<&RouteRecord> {
        self.route_by_key.get(key).map(|&pos| &self.routes[pos])
    }
}
