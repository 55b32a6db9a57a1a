//! The fare service: registration and fare computation behind one facade.
//!
//! Input has already been validated into domain types by the time it
//! reaches this layer. Every operation reports its outcome to the
//! notifier; notification never affects the result.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::{
    Cost, FareEntry, NewStation, RouteKey, RouteRecord, Station, StationKey, TripRequest,
};
use crate::engine::{FareEngine, FarePolicy, FareQuote};
use crate::error::{ErrorKind, FareError};
use crate::notify::{Channel, Notifier};
use crate::registry::{FareCacheConfig, FareTable, RouteCatalog, StationRegistry};
use crate::store::Store;

pub struct FareService {
    stations: StationRegistry,
    fares: FareTable,
    routes: RouteCatalog,
    engine: FareEngine,
    notifier: Arc<dyn Notifier>,
}

impl FareService {
    /// Build the service over a single backend serving all three tables.
    pub fn new<S: Store + 'static>(
        store: Arc<S>,
        policy: FarePolicy,
        cache: &FareCacheConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let stations = StationRegistry::new(store.clone());
        let fares = FareTable::new(store.clone(), cache);
        let routes = RouteCatalog::new(store);
        let engine = FareEngine::new(stations.clone(), fares.clone(), policy);

        Self {
            stations,
            fares,
            routes,
            engine,
            notifier,
        }
    }

    pub fn policy(&self) -> FarePolicy {
        self.engine.policy()
    }

    pub async fn register_station(&self, station: NewStation) -> Result<Station, FareError> {
        let station = self.stations.register(station).await.inspect_err(log_internal)?;

        let message = match station.distance {
            Some(km) => format!("station registered: {} ({} km)", station.name, km.km()),
            None => format!("station registered: {}", station.name),
        };
        self.notifier.notify(Channel::Registration, message);
        Ok(station)
    }

    pub async fn register_fare(
        &self,
        from: &StationKey,
        to: &StationKey,
        cost: Cost,
    ) -> Result<FareEntry, FareError> {
        let result = async {
            let from = self.stations.require(from).await?;
            let to = self.stations.require(to).await?;
            let entry = self.fares.register(&from, &to, cost).await?;
            Ok::<_, FareError>((from, to, entry))
        }
        .await
        .inspect_err(log_internal);

        let (from, to, entry) = result?;
        self.notifier.notify(
            Channel::Registration,
            format!("fare registered: {} → {} = {}", from.name, to.name, cost),
        );
        Ok(entry)
    }

    /// Register a route. Stations are checked left to right: origin, each
    /// via in order, then destination.
    pub async fn register_route(
        &self,
        from: &StationKey,
        to: &StationKey,
        via: &[StationKey],
    ) -> Result<RouteRecord, FareError> {
        let result = async {
            let from = self.stations.require(from).await?;
            let mut via_stations = Vec::with_capacity(via.len());
            for key in via {
                via_stations.push(self.stations.require(key).await?);
            }
            let to = self.stations.require(to).await?;
            let route = self.routes.register(&from, &to, &via_stations).await?;
            Ok::<_, FareError>((from, to, via_stations, route))
        }
        .await
        .inspect_err(log_internal);

        let (from, to, via_stations, route) = result?;
        self.notifier.notify(
            Channel::Registration,
            format!(
                "route registered: {} → {} via {}",
                from.name,
                to.name,
                describe_via(via_stations.iter().map(|s| s.name.to_string()))
            ),
        );
        Ok(route)
    }

    pub async fn compute_fare(&self, request: &TripRequest) -> Result<FareQuote, FareError> {
        let via = describe_via(request.via.iter().map(ToString::to_string));

        match self.engine.compute_fare(request).await {
            Ok(quote) => {
                let message = match quote.distance {
                    Some(km) => format!(
                        "search: {} → {} via {}, distance {} km, fare {}",
                        request.origin, request.destination, via, km, quote.total_fare
                    ),
                    None => format!(
                        "search: {} → {} via {}, fare {}",
                        request.origin, request.destination, via, quote.total_fare
                    ),
                };
                info!(
                    origin = %request.origin,
                    destination = %request.destination,
                    fare = quote.total_fare,
                    "fare computed"
                );
                self.notifier.notify(Channel::Search, message);
                Ok(quote)
            }
            Err(e) => {
                log_internal(&e);
                self.notifier.notify(
                    Channel::Error,
                    format!(
                        "search failed: {} → {} via {}: {}",
                        request.origin, request.destination, via, e
                    ),
                );
                Err(e)
            }
        }
    }

    /// All registered stations.
    pub async fn stations(&self) -> Result<Vec<Station>, FareError> {
        self.stations.stations().await.inspect_err(log_internal)
    }

    /// Whether an exact (from, to, via) route is registered.
    pub async fn route_exists(
        &self,
        from: &StationKey,
        to: &StationKey,
        via: &[StationKey],
    ) -> Result<bool, FareError> {
        let mut ids = Vec::with_capacity(via.len());
        for key in via {
            match self.stations.resolve(key).await? {
                Some(station) => ids.push(station.id),
                None => return Ok(false),
            }
        }
        let (Some(from), Some(to)) = (
            self.stations.resolve(from).await?,
            self.stations.resolve(to).await?,
        ) else {
            return Ok(false);
        };

        self.routes
            .contains(&RouteKey::new(from.id, to.id, ids))
            .await
    }
}

fn log_internal(e: &FareError) {
    if e.kind() == ErrorKind::InternalFailure {
        error!(error = %e, "store failure");
    }
}

fn describe_via(names: impl Iterator<Item = String>) -> String {
    let names: Vec<String> = names.collect();
    if names.is_empty() {
        "(none)".to_string()
    } else {
        format!("[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DistanceMarker, StationName};
    use crate::notify::RecordingNotifier;
    use crate::store::MemoryStore;

    fn key(s: &str) -> StationKey {
        StationKey::parse(s).unwrap()
    }

    fn new_station(name: &str, km: Option<f64>) -> NewStation {
        NewStation::new(
            StationName::parse(name).unwrap(),
            km.map(|km| DistanceMarker::new(km).unwrap()),
        )
    }

    fn cost(c: i64) -> Cost {
        Cost::new(c).unwrap()
    }

    fn service(policy: FarePolicy) -> (FareService, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let service = FareService::new(
            Arc::new(MemoryStore::new()),
            policy,
            &FareCacheConfig::default(),
            notifier.clone(),
        );
        (service, notifier)
    }

    #[tokio::test]
    async fn table_flow_end_to_end() {
        let (service, notifier) = service(FarePolicy::TableLookup);
        for name in ["A", "B", "C"] {
            service.register_station(new_station(name, None)).await.unwrap();
        }
        service
            .register_fare(&key("A"), &key("B"), cost(150))
            .await
            .unwrap();
        service
            .register_fare(&key("B"), &key("C"), cost(200))
            .await
            .unwrap();

        let request = TripRequest::new(key("A"), key("C"), vec![key("B")]);
        let quote = service.compute_fare(&request).await.unwrap();
        assert_eq!(quote.total_fare, 350);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 6);
        assert_eq!(
            sent.last().unwrap(),
            &(
                Channel::Search,
                "search: A → C via [B], fare 350".to_string()
            )
        );
    }

    #[tokio::test]
    async fn failed_search_notifies_error_channel() {
        let (service, notifier) = service(FarePolicy::TableLookup);
        service.register_station(new_station("A", None)).await.unwrap();
        service.register_station(new_station("C", None)).await.unwrap();

        let request = TripRequest::new(key("A"), key("C"), vec![]);
        let err = service.compute_fare(&request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataMissing);

        let (channel, message) = notifier.sent().pop().unwrap();
        assert_eq!(channel, Channel::Error);
        assert_eq!(
            message,
            "search failed: A → C via (none): no fare registered for A → C"
        );
    }

    #[tokio::test]
    async fn distance_flow_reports_distance() {
        let (service, notifier) = service(FarePolicy::DistanceDerived);
        service
            .register_station(new_station("A", Some(0.0)))
            .await
            .unwrap();
        service
            .register_station(new_station("B", Some(10.0)))
            .await
            .unwrap();
        service
            .register_station(new_station("C", Some(15.0)))
            .await
            .unwrap();

        let request = TripRequest::new(key("A"), key("C"), vec![key("B")]);
        let quote = service.compute_fare(&request).await.unwrap();
        assert_eq!(quote.distance, Some(15.0));
        assert_eq!(quote.total_fare, 4);

        let sent = notifier.sent();
        assert_eq!(sent[0].1, "station registered: A (0 km)");
        assert_eq!(
            sent.last().unwrap().1,
            "search: A → C via [B], distance 15 km, fare 4"
        );
    }

    #[tokio::test]
    async fn fare_registration_requires_both_stations() {
        let (service, notifier) = service(FarePolicy::TableLookup);
        service.register_station(new_station("A", None)).await.unwrap();

        let err = service
            .register_fare(&key("A"), &key("Nowhere"), cost(100))
            .await
            .unwrap_err();
        assert!(matches!(err, FareError::MissingStation(ref k) if *k == key("Nowhere")));

        // Only the station registration was announced
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn route_registration_checks_stations_in_order() {
        let (service, _) = service(FarePolicy::TableLookup);
        for name in ["A", "B", "C", "D"] {
            service.register_station(new_station(name, None)).await.unwrap();
        }

        let err = service
            .register_route(&key("A"), &key("Y"), &[key("X")])
            .await
            .unwrap_err();
        assert!(matches!(err, FareError::MissingStation(ref k) if *k == key("X")));

        service
            .register_route(&key("A"), &key("C"), &[key("B")])
            .await
            .unwrap();
        let err = service
            .register_route(&key("A"), &key("C"), &[key("B")])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        service
            .register_route(&key("A"), &key("C"), &[key("D")])
            .await
            .unwrap();

        assert!(
            service
                .route_exists(&key("A"), &key("C"), &[key("D")])
                .await
                .unwrap()
        );
        assert!(
            !service
                .route_exists(&key("A"), &key("C"), &[key("D"), key("B")])
                .await
                .unwrap()
        );
        assert!(
            !service
                .route_exists(&key("A"), &key("Q"), &[])
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn route_by_id_and_by_name_is_the_same_route() {
        let (service, _) = service(FarePolicy::TableLookup);
        let a = service.register_station(new_station("A", None)).await.unwrap();
        service.register_station(new_station("B", None)).await.unwrap();

        service
            .register_route(&key("A"), &key("B"), &[])
            .await
            .unwrap();
        let err = service
            .register_route(&StationKey::Id(a.id), &key("B"), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn routes_never_affect_pricing() {
        let (service, _) = service(FarePolicy::TableLookup);
        for name in ["A", "B", "C"] {
            service.register_station(new_station(name, None)).await.unwrap();
        }
        service
            .register_route(&key("A"), &key("C"), &[key("B")])
            .await
            .unwrap();

        let request = TripRequest::new(key("A"), key("C"), vec![key("B")]);
        let err = service.compute_fare(&request).await.unwrap_err();
        assert!(matches!(err, FareError::MissingHop { .. }));
    }
}
