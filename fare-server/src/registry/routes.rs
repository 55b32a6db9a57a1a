//! Route catalog.
//!
//! Routes are recorded but never consulted when pricing a trip; fares
//! come only from the fare table.

use std::sync::Arc;

use tracing::info;

use crate::domain::{RouteKey, RouteRecord, Station};
use crate::error::FareError;
use crate::store::RouteStore;

#[derive(Clone)]
pub struct RouteCatalog {
    store: Arc<dyn RouteStore>,
}

impl RouteCatalog {
    pub fn new(store: Arc<dyn RouteStore>) -> Self {
        Self { store }
    }

    /// Register `from → to` through `via`, in order.
    ///
    /// Uniqueness covers the whole tuple, so the same endpoints with the
    /// vias in a different order form a distinct route.
    pub async fn register(
        &self,
        from: &Station,
        to: &Station,
        via: &[Station],
    ) -> Result<RouteRecord, FareError> {
        let key = RouteKey::new(from.id, to.id, via.iter().map(|s| s.id).collect());

        let route = self.store.insert_route(key).await?.ok_or_else(|| {
            FareError::Conflict(format!(
                "route {} → {} via [{}] already registered",
                from.name,
                to.name,
                join_names(via)
            ))
        })?;

        info!(id = route.id, from = %from.name, to = %to.name, vias = via.len(), "route registered");
        Ok(route)
    }

    pub async fn contains(&self, key: &RouteKey) -> Result<bool, FareError> {
        Ok(self.store.route(key).await?.is_some())
    }
}

fn join_names(stations: &[Station]) -> String {
    stations
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
