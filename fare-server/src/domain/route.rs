//! Registered routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StationId;

/// The identity of a route: endpoints plus the ordered via list.
///
/// Via order is significant, so `A → C via [B, D]` and `A → C via [D, B]`
/// are different routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    pub from: StationId,
    pub to: StationId,
    #[serde(default)]
    pub via: Vec<StationId>,
}

impl RouteKey {
    pub fn new(from: StationId, to: StationId, via: Vec<StationId>) -> Self {
        Self { from, to, via }
    }
}

/// A stored route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub id: u32,
    #[serde(flatten)]
    pub key: RouteKey,
    pub registered_at: DateTime<Utc>,
}
