use crate::state::AppState;
use axum::{routing::get, Router};
use std::path::Path;
use tower_http::{cors::CorsLayer, services::ServeDir};

pub mod chart;
pub mod indicators;

/// API routes plus the static chart page
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/chart", get(chart::get_chart))
        .route("/indicators", get(indicators::get_indicators));

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
