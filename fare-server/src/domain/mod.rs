//! Domain types for the fare lookup service.
//!
//! All types enforce their invariants at construction time, so code that
//! receives these types can trust their validity.

mod fare;
mod itinerary;
mod route;
mod station;

pub use fare::{Cost, FareEntry, InvalidCost};
pub use itinerary::{Itinerary, TripRequest};
pub use route::{RouteKey, RouteRecord};
pub use station::{
    DistanceMarker, InvalidDistance, InvalidStationName, MAX_NAME_LEN, NewStation, Station,
    StationId, StationKey, StationName,
};
