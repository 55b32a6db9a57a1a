//! Registration layer: stations, fares, and routes.
//!
//! Each registry wraps one store table and turns store-level
//! insert-if-absent results into `Conflict` errors.

mod fares;
mod routes;
mod stations;

pub use fares::{FareCacheConfig, FareTable};
pub use routes::RouteCatalog;
pub use stations::StationRegistry;
