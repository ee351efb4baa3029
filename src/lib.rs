//! Shelter Finder
//!
//! A shelter registry backend (SQLite + axum) and the client core that reconciles it with an
//! external place-search provider and drives the admin moderation workflow.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
mod finder;
pub mod db;
pub mod errors;
pub mod gesture;
pub mod location;
pub mod models;
pub mod moderation;
pub mod notice;
pub mod places;
pub mod reconcile;
pub mod session;
pub mod settings;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use finder::ShelterFinder;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let repo = state.repo.clone();

    // Moderation routes (bearer token required)
    let admin_routes = Router::new()
        .route("/shelters/pending", get(api::list_pending))
        .route("/shelters/approve/{id}", patch(api::approve_shelter))
        .route("/shelters/reject/{id}", delete(api::reject_shelter))
        .layer(middleware::from_fn(move |req, next| {
            auth::bearer_auth_layer(repo.clone(), req, next)
        }));

    let api_routes = Router::new()
        .route(
            "/shelters",
            get(api::list_shelters).post(api::submit_shelter),
        )
        .route("/admin/login", post(api::login))
        .nest("/admin", admin_routes);

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
