//! Service-level error taxonomy.
//!
//! Every failure a caller can observe is one of four kinds: bad input,
//! a uniqueness conflict, missing reference data, or an internal failure.
//! The first three carry enough context to retry with corrected input.

use serde::Serialize;

use crate::domain::{InvalidCost, InvalidDistance, InvalidStationName, StationKey};
use crate::store::StoreError;

/// Coarse classification of a [`FareError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Conflict,
    DataMissing,
    InternalFailure,
}

/// Errors from registration and fare computation.
#[derive(Debug, thiserror::Error)]
pub enum FareError {
    /// Missing or malformed required field
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Uniqueness violation; the existing row is unchanged
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referenced station is not registered
    #[error("station {0} is not registered")]
    MissingStation(StationKey),

    /// A station exists but has no distance marker
    #[error("station {0} has no registered distance")]
    MissingDistance(StationKey),

    /// No cost can be resolved for a hop
    #[error("no fare registered for {from} → {to}")]
    MissingHop { from: StationKey, to: StationKey },

    /// Store failure
    #[error("internal failure: {0}")]
    Internal(#[from] StoreError),
}

impl FareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FareError::InvalidInput(_) => ErrorKind::InvalidInput,
            FareError::Conflict(_) => ErrorKind::Conflict,
            FareError::MissingStation(_)
            | FareError::MissingDistance(_)
            | FareError::MissingHop { .. } => ErrorKind::DataMissing,
            FareError::Internal(_) => ErrorKind::InternalFailure,
        }
    }

    /// The keys named by a data-missing error, in hop order.
    pub fn missing_keys(&self) -> Vec<&StationKey> {
        match self {
            FareError::MissingStation(key) | FareError::MissingDistance(key) => vec![key],
            FareError::MissingHop { from, to } => vec![from, to],
            _ => Vec::new(),
        }
    }

    pub(crate) fn missing_field(field: &str) -> Self {
        FareError::InvalidInput(format!("missing required field `{field}`"))
    }
}

impl From<InvalidStationName> for FareError {
    fn from(e: InvalidStationName) -> Self {
        FareError::InvalidInput(e.to_string())
    }
}

impl From<InvalidCost> for FareError {
    fn from(e: InvalidCost) -> Self {
        FareError::InvalidInput(e.to_string())
    }
}

impl From<InvalidDistance> for FareError {
    fn from(e: InvalidDistance) -> Self {
        FareError::InvalidInput(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationId;

    fn key(s: &str) -> StationKey {
        StationKey::parse(s).unwrap()
    }

    #[test]
    fn error_display() {
        let err = FareError::MissingHop {
            from: key("A"),
            to: key("C"),
        };
        assert_eq!(err.to_string(), "no fare registered for A → C");

        let err = FareError::MissingStation(StationKey::Id(StationId(9)));
        assert_eq!(err.to_string(), "station 9 is not registered");

        let err = FareError::missing_field("from");
        assert_eq!(err.to_string(), "invalid input: missing required field `from`");

        let err = FareError::Conflict("station Tokyo already exists".into());
        assert_eq!(err.to_string(), "conflict: station Tokyo already exists");
    }

    #[test]
    fn kinds() {
        assert_eq!(FareError::missing_field("to").kind(), ErrorKind::InvalidInput);
        assert_eq!(FareError::Conflict(String::new()).kind(), ErrorKind::Conflict);
        assert_eq!(
            FareError::MissingDistance(key("B")).kind(),
            ErrorKind::DataMissing
        );
        assert_eq!(
            FareError::Internal(StoreError::Corrupt("dup".into())).kind(),
            ErrorKind::InternalFailure
        );
    }

    #[test]
    fn missing_keys_name_both_hop_endpoints() {
        let err = FareError::MissingHop {
            from: key("B"),
            to: key("C"),
        };
        assert_eq!(err.missing_keys(), vec![&key("B"), &key("C")]);
        assert!(FareError::Conflict(String::new()).missing_keys().is_empty());
    }

    #[test]
    fn domain_errors_become_invalid_input() {
        let err: FareError = InvalidCost(0).into();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
