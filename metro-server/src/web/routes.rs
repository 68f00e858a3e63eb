//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::cache::PlanError;
use crate::domain::QueryError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(list_stations))
        .route("/api/stations/lookup", get(lookup_station))
        .route("/api/route/shortest", get(shortest_route))
        .route("/api/route/interchanges", get(interchange_route))
        .route("/api/fares", get(fare_table))
        .route("/api/fare", get(fare_for_distance))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// All stations in alphabetical order.
async fn list_stations(State(state): State<AppState>) -> Json<StationListResponse> {
    Json(StationListResponse::from_snapshot(state.planner.snapshot()))
}

/// Resolve a station name or index.
async fn lookup_station(
    State(state): State<AppState>,
    Query(req): Query<LookupRequest>,
) -> Result<Json<LookupResponse>, AppError> {
    let snapshot = state.planner.snapshot();
    let id = snapshot.lookup(&req.q)?;

    let registry = &snapshot.registry;
    let (Some(index), Some(record)) = (registry.index_of(&id), registry.get(&id)) else {
        return Err(QueryError::UnknownStation(req.q).into());
    };

    Ok(Json(LookupResponse {
        query: req.q,
        station: StationResult::from_record(index, record),
    }))
}

/// Minimum-distance route.
async fn shortest_route(
    State(state): State<AppState>,
    Query(req): Query<RouteRequest>,
) -> Result<Json<ShortestRouteResponse>, AppError> {
    let route = state
        .planner
        .shortest_by_distance(&req.from, &req.to)
        .await?;

    Ok(Json(ShortestRouteResponse::from_route(
        &route,
        state.planner.snapshot(),
    )))
}

/// Route with the fewest line changes.
async fn interchange_route(
    State(state): State<AppState>,
    Query(req): Query<RouteRequest>,
) -> Result<Json<InterchangeRouteResponse>, AppError> {
    let route = state
        .planner
        .shortest_by_interchanges(&req.from, &req.to)
        .await?;

    Ok(Json(InterchangeRouteResponse::from_route(&route)))
}

/// The fare bands in use.
async fn fare_table(State(state): State<AppState>) -> Json<FareTableResponse> {
    Json(FareTableResponse {
        bands: state.planner.snapshot().fares.bands().to_vec(),
    })
}

/// Fare for a given distance.
async fn fare_for_distance(
    State(state): State<AppState>,
    Query(req): Query<FareRequest>,
) -> Result<Json<FareResponse>, AppError> {
    if !req.distance.is_finite() {
        return Err(AppError::BadRequest {
            message: format!("Invalid distance: {}", req.distance),
        });
    }

    Ok(Json(FareResponse {
        distance: req.distance,
        fare: state.planner.snapshot().fare(req.distance),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        let message = e.to_string();
        match e {
            QueryError::UnknownStation(_) => AppError::BadRequest { message },
            QueryError::NoPath { .. } => AppError::NotFound { message },
            QueryError::Timeout => AppError::Unavailable { message },
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Query(e) => e.into(),
            PlanError::Task(e) => AppError::Internal {
                message: format!("route search failed: {e}"),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
