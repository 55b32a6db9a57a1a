//! Fare computation policies.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Fare per kilometre under the distance-derived policy.
pub const FARE_PER_KM: f64 = 0.24;

/// How a hop's cost is resolved. Chosen once per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FarePolicy {
    /// Sum the registered fare of every hop.
    #[default]
    TableLookup,

    /// Sum marker distances over all hops, then price the total once.
    DistanceDerived,
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fare policy {0:?} (expected \"table\" or \"distance\")")]
pub struct UnknownPolicy(pub String);

impl FromStr for FarePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "table-lookup" | "table_lookup" => Ok(FarePolicy::TableLookup),
            "distance" | "distance-derived" | "distance_derived" => {
                Ok(FarePolicy::DistanceDerived)
            }
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for FarePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FarePolicy::TableLookup => f.write_str("table-lookup"),
            FarePolicy::DistanceDerived => f.write_str("distance-derived"),
        }
    }
}

/// Price a total distance: `ceil(km × 0.24)`.
///
/// Applied once to the summed distance, never per hop.
///
/// ```
/// use fare_server::engine::distance_fare;
///
/// assert_eq!(distance_fare(15.0), 4);
/// assert_eq!(distance_fare(0.0), 0);
/// ```
pub fn distance_fare(total_km: f64) -> u64 {
    (total_km * FARE_PER_KM).ceil() as u64
}
