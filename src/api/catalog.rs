//! Catalog API endpoints.
//!
//! Serve the fixed vocabularies so clients never hardcode their own copies.

use axum::Json;

use crate::catalog;

/// GET /api/roles - The enumerated role labels.
pub async fn list_roles() -> Json<Vec<&'static str>> {
    Json(catalog::ROLES.to_vec())
}

/// GET /api/teams - The enumerated team labels.
pub async fn list_teams() -> Json<Vec<&'static str>> {
    Json(catalog::TEAMS.to_vec())
}
