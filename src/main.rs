// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::feed_repository::FeedRepository;
use crate::application::feed_subscription::FeedSubscription;
use crate::application::greenhouse_service::GreenhouseService;
use crate::application::rover_service::RoverService;
use crate::domain::greenhouse::GreenhouseMeasurement;
use crate::domain::rover::RoverStatus;
use crate::domain::status::StatusClassifier;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::firebase_repository::FirebaseFeed;
use crate::presentation::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("terrasense=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_app_config().context("Failed to load configuration")?;

    // Create feed repository (infrastructure layer)
    let repository: Arc<dyn FeedRepository> = Arc::new(FirebaseFeed::new(
        config.firebase.database_url.clone(),
        config.firebase.poll_interval(),
        config.firebase.request_timeout(),
    )?);

    // Subscribe to both collections
    let greenhouse_feed =
        FeedSubscription::<GreenhouseMeasurement>::start(repository.clone(), &config.feeds.greenhouse);
    let rover_feed = FeedSubscription::<RoverStatus>::start(repository.clone(), &config.feeds.rover);

    // Create services (application layer)
    let classifier = StatusClassifier::new(config.mood.thresholds, config.mood.labels.clone());
    let state = Arc::new(AppState {
        greenhouse_service: GreenhouseService::new(
            greenhouse_feed.watch(),
            classifier,
            config.insights,
        ),
        rover_service: RoverService::new(rover_feed.watch(), config.rover),
    });

    // Build router (presentation layer)
    let router = presentation::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!("Starting terrasense service on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    greenhouse_feed.stop().await;
    rover_feed.stop().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
