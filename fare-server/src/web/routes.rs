//! HTTP route handlers.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::engine::FareQuote;
use crate::error::{ErrorKind, FareError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/stations", get(list_stations).post(register_station))
        .route("/fares", post(register_fare))
        .route("/routes", post(register_route))
        .route("/search", get(search_query).post(search_body))
        // Paths used by earlier clients
        .route("/add_station", post(register_station))
        .route("/api/add-station", post(register_station))
        .route("/add_fare", post(register_fare))
        .route("/add_route", post(register_route))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body manually so we can log it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::BadRequest {
            message: format!("invalid input: invalid JSON: {e}"),
        }
    })
}

/// Register a station.
async fn register_station(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StationResponse>, AppError> {
    let req: RegisterStationRequest = parse_body(&body)?;
    let station = state.service.register_station(req.into_new_station()?).await?;

    Ok(Json(StationResponse {
        station: station.into(),
    }))
}

/// List every registered station.
async fn list_stations(State(state): State<AppState>) -> Result<Json<StationsResponse>, AppError> {
    let stations = state.service.stations().await?;

    Ok(Json(StationsResponse {
        stations: stations.into_iter().map(StationResult::from).collect(),
    }))
}

/// Register the fare for one directed hop.
async fn register_fare(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FareResponse>, AppError> {
    let req: RegisterFareRequest = parse_body(&body)?;
    let (from, to, cost) = req.into_parts()?;
    let fare = state.service.register_fare(&from, &to, cost).await?;

    Ok(Json(FareResponse { fare }))
}

/// Register a route.
async fn register_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RouteResponse>, AppError> {
    let req: RegisterRouteRequest = parse_body(&body)?;
    let (from, to, via) = req.into_parts()?;
    let route = state.service.register_route(&from, &to, &via).await?;

    Ok(Json(RouteResponse { route }))
}

/// Compute a fare from a JSON body.
async fn search_body(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FareQuote>, AppError> {
    let req: SearchRequest = parse_body(&body)?;
    let trip = req.into_trip()?;

    Ok(Json(state.service.compute_fare(&trip).await?))
}

/// Compute a fare from query parameters.
async fn search_query(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<FareQuote>, AppError> {
    let Query(query) = query.map_err(|e| {
        warn!(error = %e.body_text(), "invalid query string");
        AppError::BadRequest {
            message: format!("invalid input: {}", e.body_text()),
        }
    })?;
    let trip = query.into_trip()?;

    Ok(Json(state.service.compute_fare(&trip).await?))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Conflict { message: String },
    NotFound { message: String, missing: Vec<String> },
    Internal { message: String },
}

impl From<FareError> for AppError {
    fn from(e: FareError) -> Self {
        let message = e.to_string();
        match e.kind() {
            ErrorKind::InvalidInput => AppError::BadRequest { message },
            ErrorKind::Conflict => AppError::Conflict { message },
            ErrorKind::DataMissing => AppError::NotFound {
                missing: e.missing_keys().iter().map(ToString::to_string).collect(),
                message,
            },
            ErrorKind::InternalFailure => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    kind: ErrorKind::InvalidInput,
                    error: message,
                    missing: Vec::new(),
                },
            ),
            AppError::Conflict { message } => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    kind: ErrorKind::Conflict,
                    error: message,
                    missing: Vec::new(),
                },
            ),
            AppError::NotFound { message, missing } => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    kind: ErrorKind::DataMissing,
                    error: message,
                    missing,
                },
            ),
            AppError::Internal { message } => {
                error!(cause = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        kind: ErrorKind::InternalFailure,
                        error: "internal server error".to_string(),
                        missing: Vec::new(),
                    },
                )
            }
        };

        if !status.is_server_error() {
            warn!(%status, error = %body.error, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}
