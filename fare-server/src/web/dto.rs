//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Cost, DistanceMarker, FareEntry, NewStation, RouteRecord, Station, StationId, StationKey,
    StationName, TripRequest,
};
use crate::error::{ErrorKind, FareError};

/// A station reference as sent by clients: a JSON number is an id, a
/// string is a name (or an id, if it is all digits).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StationRef {
    Id(u64),
    Name(String),
}

impl StationRef {
    pub fn to_key(&self) -> Result<StationKey, FareError> {
        match self {
            StationRef::Id(id) => Ok(StationKey::Id(StationId(
                u32::try_from(*id).unwrap_or(u32::MAX),
            ))),
            StationRef::Name(name) => Ok(StationKey::parse(name)?),
        }
    }
}

fn required_key(field: &str, value: Option<&StationRef>) -> Result<StationKey, FareError> {
    value
        .ok_or_else(|| FareError::missing_field(field))?
        .to_key()
}

fn via_keys(via: Option<&[StationRef]>) -> Result<Vec<StationKey>, FareError> {
    via.unwrap_or_default()
        .iter()
        .map(StationRef::to_key)
        .collect()
}

/// Request to register a station.
#[derive(Debug, Deserialize)]
pub struct RegisterStationRequest {
    /// Station name
    pub name: Option<String>,

    /// Kilometre marker along the line
    pub distance: Option<f64>,
}

impl RegisterStationRequest {
    pub fn into_new_station(self) -> Result<NewStation, FareError> {
        let name = self.name.ok_or_else(|| FareError::missing_field("name"))?;
        let name = StationName::parse(&name)?;
        let distance = self.distance.map(DistanceMarker::new).transpose()?;
        Ok(NewStation::new(name, distance))
    }
}

/// Request to register a fare between two stations.
#[derive(Debug, Deserialize)]
pub struct RegisterFareRequest {
    /// Origin station
    #[serde(alias = "from_id")]
    pub from: Option<StationRef>,

    /// Destination station
    #[serde(alias = "to_id")]
    pub to: Option<StationRef>,

    /// Fare for the hop; a positive integer
    #[serde(alias = "fare")]
    pub cost: Option<i64>,
}

impl RegisterFareRequest {
    pub fn into_parts(self) -> Result<(StationKey, StationKey, Cost), FareError> {
        let from = required_key("from", self.from.as_ref())?;
        let to = required_key("to", self.to.as_ref())?;
        let cost = self.cost.ok_or_else(|| FareError::missing_field("cost"))?;
        Ok((from, to, Cost::new(cost)?))
    }
}

/// Request to register a route.
#[derive(Debug, Deserialize)]
pub struct RegisterRouteRequest {
    /// Origin station
    #[serde(alias = "from_id")]
    pub from: Option<StationRef>,

    /// Destination station
    #[serde(alias = "to_id")]
    pub to: Option<StationRef>,

    /// Intermediate stations, in order
    #[serde(alias = "via_ids")]
    pub via: Option<Vec<StationRef>>,
}

impl RegisterRouteRequest {
    pub fn into_parts(self) -> Result<(StationKey, StationKey, Vec<StationKey>), FareError> {
        let from = required_key("from", self.from.as_ref())?;
        let to = required_key("to", self.to.as_ref())?;
        let via = via_keys(self.via.as_deref())?;
        Ok((from, to, via))
    }
}

/// Fare search request body.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Origin station
    #[serde(alias = "from_id")]
    pub from: Option<StationRef>,

    /// Destination station
    #[serde(alias = "to_id")]
    pub to: Option<StationRef>,

    /// Intermediate stations, in order
    #[serde(alias = "via_ids")]
    pub via: Option<Vec<StationRef>>,
}

impl SearchRequest {
    pub fn into_trip(self) -> Result<TripRequest, FareError> {
        let from = required_key("from", self.from.as_ref())?;
        let to = required_key("to", self.to.as_ref())?;
        let via = via_keys(self.via.as_deref())?;
        Ok(TripRequest::new(from, to, via))
    }
}

/// Fare search query string (`?from=A&to=C&via=B,D`).
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(alias = "from_id")]
    pub from: Option<String>,

    #[serde(alias = "to_id")]
    pub to: Option<String>,

    /// Comma-separated intermediate stations
    #[serde(alias = "via_ids")]
    pub via: Option<String>,
}

impl SearchQuery {
    pub fn into_trip(self) -> Result<TripRequest, FareError> {
        let from = self
            .from
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| FareError::missing_field("from"))?;
        let to = self
            .to
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| FareError::missing_field("to"))?;

        let via = self
            .via
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(StationKey::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TripRequest::new(
            StationKey::parse(&from)?,
            StationKey::parse(&to)?,
            via,
        ))
    }
}

/// A registered station.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub id: StationId,
    pub name: StationName,

    /// Kilometre marker, if one was registered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,

    pub registered_at: DateTime<Utc>,
}

impl From<Station> for StationResult {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            name: station.name,
            distance: station.distance.map(DistanceMarker::km),
            registered_at: station.registered_at,
        }
    }
}

/// Response to a station registration.
#[derive(Debug, Serialize)]
pub struct StationResponse {
    pub station: StationResult,
}

/// Response listing every registered station.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationResult>,
}

/// Response to a fare registration.
#[derive(Debug, Serialize)]
pub struct FareResponse {
    pub fare: FareEntry,
}

/// Response to a route registration.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub route: RouteRecord,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error classification
    pub kind: ErrorKind,

    /// Error message
    pub error: String,

    /// Stations named by a data-missing error, in hop order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StationKey {
        StationKey::parse(s).unwrap()
    }

    #[test]
    fn station_refs_accept_numbers_and_strings() {
        let body: SearchRequest =
            serde_json::from_str(r#"{"from": 1, "to": "Kyoto", "via": ["2", "Nagoya"]}"#).unwrap();
        let trip = body.into_trip().unwrap();

        assert_eq!(trip.origin, StationKey::Id(StationId(1)));
        assert_eq!(trip.destination, key("Kyoto"));
        assert_eq!(trip.via, vec![StationKey::Id(StationId(2)), key("Nagoya")]);
    }

    #[test]
    fn legacy_field_names_are_accepted() {
        let body: RegisterFareRequest =
            serde_json::from_str(r#"{"from_id": 1, "to_id": 2, "fare": 150}"#).unwrap();
        let (from, to, cost) = body.into_parts().unwrap();

        assert_eq!(from, StationKey::Id(StationId(1)));
        assert_eq!(to, StationKey::Id(StationId(2)));
        assert_eq!(cost.get(), 150);
    }

    #[test]
    fn missing_fields_are_invalid_input() {
        let body: RegisterFareRequest = serde_json::from_str(r#"{"from": "A", "to": "B"}"#).unwrap();
        let err = body.into_parts().unwrap_err();
        assert_eq!(err.to_string(), "invalid input: missing required field `cost`");

        let body: SearchRequest = serde_json::from_str(r#"{"to": "B"}"#).unwrap();
        let err = body.into_trip().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let body: RegisterStationRequest = serde_json::from_str(r#"{"distance": 3.5}"#).unwrap();
        assert_eq!(
            body.into_new_station().unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn non_positive_cost_is_invalid_input() {
        for cost in [0, -5] {
            let body = RegisterFareRequest {
                from: Some(StationRef::Name("A".into())),
                to: Some(StationRef::Name("B".into())),
                cost: Some(cost),
            };
            assert_eq!(body.into_parts().unwrap_err().kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn blank_station_name_is_invalid_input() {
        let body = RegisterStationRequest {
            name: Some("   ".into()),
            distance: None,
        };
        assert_eq!(
            body.into_new_station().unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn query_via_is_comma_separated() {
        let query = SearchQuery {
            from: Some("A".into()),
            to: Some("D".into()),
            via: Some("B, C,".into()),
        };
        let trip = query.into_trip().unwrap();
        assert_eq!(trip.via, vec![key("B"), key("C")]);

        let query = SearchQuery {
            from: Some("A".into()),
            to: Some("D".into()),
            via: None,
        };
        assert!(query.into_trip().unwrap().via.is_empty());
    }

    #[test]
    fn query_requires_endpoints() {
        let query = SearchQuery {
            from: Some(" ".into()),
            to: Some("D".into()),
            via: None,
        };
        assert_eq!(
            query.into_trip().unwrap_err().to_string(),
            "invalid input: missing required field `from`"
        );
    }

    #[test]
    fn station_result_flattens_marker() {
        let station = Station {
            id: StationId(3),
            name: StationName::parse("Maibara").unwrap(),
            distance: Some(DistanceMarker::new(445.9).unwrap()),
            registered_at: Utc::now(),
        };
        let json = serde_json::to_value(StationResult::from(station)).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Maibara");
        assert_eq!(json["distance"], 445.9);
    }
}
