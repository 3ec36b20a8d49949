// HTTP request handlers
use crate::application::greenhouse_service::{GreenhouseOverview, PlantReport};
use crate::application::rover_service::RoverOverview;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Latest measurement, mood and insights for every plant
pub async fn greenhouse_overview(State(state): State<Arc<AppState>>) -> Json<GreenhouseOverview> {
    Json(state.greenhouse_service.overview())
}

/// Single plant by name
pub async fn plant_detail(
    Path(plant): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlantReport>, StatusCode> {
    match state.greenhouse_service.plant(&plant) {
        Some(report) => Ok(Json(report)),
        None => {
            tracing::debug!("No measurements for plant {}", plant);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Latest rover telemetry
pub async fn rover_overview(State(state): State<Arc<AppState>>) -> Json<RoverOverview> {
    Json(state.rover_service.overview())
}
