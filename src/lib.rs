pub mod config;
pub mod db;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::db::{DbInitError, Storage};
use crate::state::AppState;

/// Builds the application router from environment configuration.
pub async fn create_app() -> Result<axum::Router, DbInitError> {
    let config = Config::from_env();
    let storage = Storage::connect(&config.database_url).await?;
    Ok(create_app_with(AppState::new(
        storage,
        config.quiz_mastery_feedback,
    )))
}

/// Builds the router around an already-connected state; tests use this with
/// a throwaway database.
pub fn create_app_with(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
