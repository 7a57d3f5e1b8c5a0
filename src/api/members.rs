//! Member API endpoints.
//!
//! The collection-level routes carry the addressed id in the request body
//! rather than the path, matching the stored-document shape: clients send the
//! same partial member object to every mutation.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Member, MemberDraft};
use crate::AppState;

/// GET /api/members - List the collection in stored order.
pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>, AppError> {
    let members = state.store.list().await?;
    Ok(Json(members))
}

/// POST /api/members - Create a member from a partial record.
pub async fn create_member(
    State(state): State<AppState>,
    Json(draft): Json<MemberDraft>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    let member = state.store.create(draft).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// PUT /api/members - Merge a draft over the record addressed by its id.
pub async fn update_member(
    State(state): State<AppState>,
    Json(draft): Json<MemberDraft>,
) -> Result<Json<Member>, AppError> {
    let member = state.store.update(draft).await?;
    Ok(Json(member))
}

/// Request body of a delete: just the addressed id.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteMemberRequest {
    pub id: i64,
}

/// Confirmation body of a successful delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// DELETE /api/members - Remove the record addressed by the body's id.
pub async fn delete_member(
    State(state): State<AppState>,
    Json(request): Json<DeleteMemberRequest>,
) -> Result<Json<DeleteConfirmation>, AppError> {
    state.store.delete(request.id).await?;
    Ok(Json(DeleteConfirmation {
        message: "Member deleted".to_string(),
    }))
}
