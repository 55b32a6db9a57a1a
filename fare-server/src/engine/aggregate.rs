//! Fare aggregation over an itinerary.
//!
//! The engine walks the itinerary's hops strictly left to right. The first
//! hop that cannot be resolved aborts the walk with an error naming both
//! of its endpoints; later hops are never looked at and no partial total
//! is returned.

use serde::Serialize;
use tracing::debug;

use crate::domain::{Itinerary, Station, StationName, TripRequest};
use crate::error::FareError;
use crate::registry::{FareTable, StationRegistry};

use super::policy::{FarePolicy, distance_fare};

/// A successful fare computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareQuote {
    /// Stops in traversal order.
    pub itinerary: Vec<StationName>,

    /// Total fare for the trip.
    pub total_fare: u64,

    /// Summed hop distance in km (distance-derived policy only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,

    /// Policy that produced this quote.
    pub policy: FarePolicy,
}

/// Computes trip fares from registered stations and fares.
#[derive(Clone)]
pub struct FareEngine {
    stations: StationRegistry,
    fares: FareTable,
    policy: FarePolicy,
}

impl FareEngine {
    pub fn new(stations: StationRegistry, fares: FareTable, policy: FarePolicy) -> Self {
        Self {
            stations,
            fares,
            policy,
        }
    }

    pub fn policy(&self) -> FarePolicy {
        self.policy
    }

    /// Compute the fare for `origin → via… → destination`.
    pub async fn compute_fare(&self, request: &TripRequest) -> Result<FareQuote, FareError> {
        let itinerary = request.itinerary();
        match self.policy {
            FarePolicy::TableLookup => self.sum_table_fares(&itinerary).await,
            FarePolicy::DistanceDerived => self.sum_distances(&itinerary).await,
        }
    }

    /// Sum the registered fare of each hop.
    async fn sum_table_fares(&self, itinerary: &Itinerary) -> Result<FareQuote, FareError> {
        let origin = self.stations.require(itinerary.origin()).await?;
        let destination = self.stations.require(itinerary.destination()).await?;

        let last_hop = itinerary.hop_count() - 1;
        let mut names = Vec::with_capacity(itinerary.stops().len());
        names.push(origin.name.clone());

        let mut current = origin;
        let mut total: u64 = 0;

        for (i, (from_key, to_key)) in itinerary.hops().enumerate() {
            let missing = || FareError::MissingHop {
                from: from_key.clone(),
                to: to_key.clone(),
            };

            let next = if i == last_hop {
                destination.clone()
            } else {
                self.stations.resolve(to_key).await?.ok_or_else(missing)?
            };

            // Staying put costs nothing and needs no table entry
            let cost = if current.id == next.id {
                0
            } else {
                self.fares
                    .lookup(current.id, next.id)
                    .await?
                    .ok_or_else(missing)?
                    .get()
            };

            debug!(hop = i, from = %current.name, to = %next.name, cost, "hop resolved");
            total += u64::from(cost);
            names.push(next.name.clone());
            current = next;
        }

        Ok(FareQuote {
            itinerary: names,
            total_fare: total,
            distance: None,
            policy: FarePolicy::TableLookup,
        })
    }

    /// Sum marker distances over every hop, then price the total once.
    async fn sum_distances(&self, itinerary: &Itinerary) -> Result<FareQuote, FareError> {
        let (origin, origin_km) = self.stations.require_marked(itinerary.origin()).await?;
        let (destination, destination_km) = self
            .stations
            .require_marked(itinerary.destination())
            .await?;

        let last_hop = itinerary.hop_count() - 1;
        let mut names = Vec::with_capacity(itinerary.stops().len());
        names.push(origin.name);

        let mut current_km = origin_km;
        let mut total_km = 0.0;

        for (i, (from_key, to_key)) in itinerary.hops().enumerate() {
            let (next_name, next_km) = if i == last_hop {
                (destination.name.clone(), destination_km)
            } else {
                match self.stations.resolve(to_key).await? {
                    Some(Station {
                        name,
                        distance: Some(km),
                        ..
                    }) => (name, km),
                    _ => {
                        return Err(FareError::MissingHop {
                            from: from_key.clone(),
                            to: to_key.clone(),
                        });
                    }
                }
            };

            let hop_km = current_km.distance_to(next_km);
            debug!(hop = i, to = %next_name, km = hop_km, "hop resolved");
            total_km += hop_km;
            names.push(next_name);
            current_km = next_km;
        }

        Ok(FareQuote {
            itinerary: names,
            total_fare: distance_fare(total_km),
            distance: Some(total_km),
            policy: FarePolicy::DistanceDerived,
        })
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
