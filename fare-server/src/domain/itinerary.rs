//! Trip requests and the itineraries derived from them.

use super::StationKey;

/// A fare query: origin, destination, and the stations passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    pub origin: StationKey,
    pub destination: StationKey,
    pub via: Vec<StationKey>,
}

impl TripRequest {
    pub fn new(origin: StationKey, destination: StationKey, via: Vec<StationKey>) -> Self {
        Self {
            origin,
            destination,
            via,
        }
    }

    /// The full stop sequence: origin, vias in order, destination.
    pub fn itinerary(&self) -> Itinerary {
        let mut stops = Vec::with_capacity(self.via.len() + 2);
        stops.push(self.origin.clone());
        stops.extend(self.via.iter().cloned());
        stops.push(self.destination.clone());
        Itinerary { stops }
    }
}

/// An ordered sequence of at least two stops.
///
/// Only constructible from a [`TripRequest`], which guarantees the
/// two-stop minimum and therefore at least one hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    stops: Vec<StationKey>,
}

impl Itinerary {
    pub fn stops(&self) -> &[StationKey] {
        &self.stops
    }

    pub fn origin(&self) -> &StationKey {
        &self.stops[0]
    }

    pub fn destination(&self) -> &StationKey {
        &self.stops[self.stops.len() - 1]
    }

    /// Consecutive stop pairs, left to right.
    pub fn hops(&self) -> impl Iterator<Item = (&StationKey, &StationKey)> + '_ {
        self.stops.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    pub fn hop_count(&self) -> usize {
        self.stops.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StationKey {
        StationKey::parse(s).unwrap()
    }

    #[test]
    fn direct_trip_has_one_hop() {
        let trip = TripRequest::new(key("A"), key("B"), vec![]);
        let itinerary = trip.itinerary();
        assert_eq!(itinerary.stops(), &[key("A"), key("B")]);
        assert_eq!(itinerary.hop_count(), 1);
        assert_eq!(itinerary.hops().collect::<Vec<_>>(), vec![(&key("A"), &key("B"))]);
    }

    #[test]
    fn vias_keep_their_order() {
        let trip = TripRequest::new(key("A"), key("D"), vec![key("C"), key("B")]);
        let itinerary = trip.itinerary();
        let hops: Vec<_> = itinerary
            .hops()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        assert_eq!(
            hops,
            vec![
                ("A".to_string(), "C".to_string()),
                ("C".to_string(), "B".to_string()),
                ("B".to_string(), "D".to_string()),
            ]
        );
        assert_eq!(itinerary.origin(), &key("A"));
        assert_eq!(itinerary.destination(), &key("D"));
    }

    #[test]
    fn repeated_station_is_kept() {
        let trip = TripRequest::new(key("A"), key("A"), vec![]);
        assert_eq!(trip.itinerary().hop_count(), 1);
    }
}
