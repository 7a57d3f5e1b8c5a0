//! Team Directory
//!
//! A member directory in two halves: a REST gateway over a small member
//! collection, and the headless list engine a table UI embeds. The gateway
//! serves `/api/members` plus catalog routes and persists through a
//! pluggable store; the engine (`view`, `client`) keeps an in-memory copy
//! with search, facet filters, stable sorting, and URL-shareable view state,
//! refetching the collection after every mutation.

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod store;
pub mod view;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use store::MemberStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MemberStore>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Members
        .route("/members", get(api::list_members))
        .route("/members", post(api::create_member))
        .route("/members", put(api::update_member))
        .route("/members", delete(api::delete_member))
        // Catalog
        .route("/roles", get(api::list_roles))
        .route("/teams", get(api::list_teams));

    // Health check
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
