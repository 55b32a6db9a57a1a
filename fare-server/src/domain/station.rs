//! Station identity types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a station name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Error returned when parsing an invalid station name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: {reason}")]
pub struct InvalidStationName {
    reason: &'static str,
}

/// Error returned when a distance marker is not a finite number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid distance marker: {0} is not a finite number")]
pub struct InvalidDistance(pub f64);

/// Store-assigned numeric station id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u32);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated station name.
///
/// Names are trimmed, non-empty, at most [`MAX_NAME_LEN`] characters, and
/// never consist purely of ASCII digits: a numeric reference always means
/// a [`StationId`].
///
/// # Examples
///
/// ```
/// use fare_server::domain::StationName;
///
/// let tokyo = StationName::parse("  Tokyo ").unwrap();
/// assert_eq!(tokyo.as_str(), "Tokyo");
///
/// assert!(StationName::parse("").is_err());
/// assert!(StationName::parse("123").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationName(String);

impl StationName {
    /// Parse a station name from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStationName> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStationName {
                reason: "must not be empty",
            });
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(InvalidStationName {
                reason: "must be at most 100 characters",
            });
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationName {
                reason: "must not be purely numeric",
            });
        }

        Ok(StationName(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationName {
    type Error = InvalidStationName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StationName::parse(&value)
    }
}

impl From<StationName> for String {
    fn from(name: StationName) -> Self {
        name.0
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.0)
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reference to a station, by id or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StationKey {
    Id(StationId),
    Name(StationName),
}

impl StationKey {
    /// Parse a station reference.
    ///
    /// All-digit input is an id; anything else must be a valid name.
    pub fn parse(s: &str) -> Result<Self, InvalidStationName> {
        let trimmed = s.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            // Out-of-range ids saturate and simply never match a stored row.
            let id = trimmed.parse::<u32>().unwrap_or(u32::MAX);
            return Ok(StationKey::Id(StationId(id)));
        }
        StationName::parse(trimmed).map(StationKey::Name)
    }
}

impl From<StationId> for StationKey {
    fn from(id: StationId) -> Self {
        StationKey::Id(id)
    }
}

impl From<StationName> for StationKey {
    fn from(name: StationName) -> Self {
        StationKey::Name(name)
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationKey::Id(id) => write!(f, "{id}"),
            StationKey::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Position of a station along the line, in kilometres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DistanceMarker(f64);

impl DistanceMarker {
    /// Create a marker, rejecting NaN and infinities.
    pub fn new(km: f64) -> Result<Self, InvalidDistance> {
        if km.is_finite() {
            Ok(DistanceMarker(km))
        } else {
            Err(InvalidDistance(km))
        }
    }

    /// Returns the marker in kilometres.
    pub fn km(self) -> f64 {
        self.0
    }

    /// Absolute distance between two markers.
    pub fn distance_to(self, other: DistanceMarker) -> f64 {
        (other.0 - self.0).abs()
    }
}

impl TryFrom<f64> for DistanceMarker {
    type Error = InvalidDistance;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        DistanceMarker::new(value)
    }
}

impl From<DistanceMarker> for f64 {
    fn from(marker: DistanceMarker) -> Self {
        marker.0
    }
}

/// A station registration request, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStation {
    pub name: StationName,
    pub distance: Option<DistanceMarker>,
}

impl NewStation {
    pub fn new(name: StationName, distance: Option<DistanceMarker>) -> Self {
        Self { name, distance }
    }
}

/// A registered station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: StationName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<DistanceMarker>,
    pub registered_at: DateTime<Utc>,
}

impl Station {
    /// Whether `key` refers to this station.
    pub fn matches(&self, key: &StationKey) -> bool {
        match key {
            StationKey::Id(id) => *id == self.id,
            StationKey::Name(name) => *name == self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let name = StationName::parse("  Shin-Osaka\t").unwrap();
        assert_eq!(name.as_str(), "Shin-Osaka");
    }

    #[test]
    fn reject_empty_and_blank() {
        assert!(StationName::parse("").is_err());
        assert!(StationName::parse("   ").is_err());
    }

    #[test]
    fn reject_numeric_names() {
        assert!(StationName::parse("42").is_err());
        assert!(StationName::parse("Route 42").is_ok());
    }

    #[test]
    fn reject_long_names() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(StationName::parse(&long).is_err());
        assert!(StationName::parse(&"x".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn multibyte_length_counts_characters() {
        let name = "駅".repeat(MAX_NAME_LEN);
        assert!(StationName::parse(&name).is_ok());
    }

    #[test]
    fn key_parses_digits_as_id() {
        assert_eq!(StationKey::parse("7").unwrap(), StationKey::Id(StationId(7)));
        assert_eq!(
            StationKey::parse("Kyoto").unwrap(),
            StationKey::Name(StationName::parse("Kyoto").unwrap())
        );
        assert!(StationKey::parse("").is_err());
    }

    #[test]
    fn key_display() {
        assert_eq!(StationKey::Id(StationId(3)).to_string(), "3");
        assert_eq!(StationKey::parse("Nagoya").unwrap().to_string(), "Nagoya");
    }

    #[test]
    fn distance_rejects_non_finite() {
        assert!(DistanceMarker::new(f64::NAN).is_err());
        assert!(DistanceMarker::new(f64::INFINITY).is_err());
        assert!(DistanceMarker::new(0.0).is_ok());
    }

    #[test]
    fn distance_is_absolute() {
        let a = DistanceMarker::new(10.0).unwrap();
        let b = DistanceMarker::new(2.5).unwrap();
        assert_eq!(a.distance_to(b), 7.5);
        assert_eq!(b.distance_to(a), 7.5);
    }

    #[test]
    fn name_deserialize_validates() {
        let ok: Result<StationName, _> = serde_json::from_str("\"Osaka\"");
        assert!(ok.is_ok());
        let bad: Result<StationName, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
