//! Application state for the web layer.

use std::sync::Arc;

use crate::service::FareService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registration and fare computation
    pub service: Arc<FareService>,
}

impl AppState {
    pub fn new(service: FareService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
