//! Fare table entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StationId;

/// Error returned when a fare cost is not a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid cost {0}: must be a positive integer")]
pub struct InvalidCost(pub i64);

/// Cost of a single hop. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Cost(u32);

impl Cost {
    /// Validate a cost.
    ///
    /// ```
    /// use fare_server::domain::Cost;
    ///
    /// assert_eq!(Cost::new(150).unwrap().get(), 150);
    /// assert!(Cost::new(0).is_err());
    /// assert!(Cost::new(-5).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, InvalidCost> {
        match u32::try_from(value) {
            Ok(v) if v > 0 => Ok(Cost(v)),
            _ => Err(InvalidCost(value)),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Cost {
    type Error = InvalidCost;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Cost::new(value)
    }
}

impl From<Cost> for u32 {
    fn from(cost: Cost) -> Self {
        cost.0
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered fare for one ordered station pair.
///
/// Direction matters: the entry for `(a, b)` says nothing about `(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareEntry {
    pub id: u32,
    pub from: StationId,
    pub to: StationId,
    pub cost: Cost,
    pub registered_at: DateTime<Utc>,
}

impl FareEntry {
    /// The ordered pair this entry prices.
    pub fn pair(&self) -> (StationId, StationId) {
        (self.from, self.to)
    }
}
