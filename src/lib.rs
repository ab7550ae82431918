pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use services::metrics::PlanMetricsCollector;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub collector: PlanMetricsCollector,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
