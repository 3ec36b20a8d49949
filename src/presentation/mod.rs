// Presentation layer - HTTP routes
pub mod app_state;
pub mod handlers;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    greenhouse_overview, health_check, plant_detail, rover_overview,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/greenhouse", get(greenhouse_overview))
        .route("/greenhouse/:plant", get(plant_detail))
        .route("/rover", get(rover_overview))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
