use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::db;
use crate::error::AppError;
use crate::middleware::auth::AdminUser;
use crate::models::member::UpdateMember;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub ids: Vec<String>,
}

pub async fn list_pending(
    State(state): State<AppState>,
    _auth: AdminUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let pending = db::pending::list_pending(&state.db).await?;
    Ok(Json(serde_json::json!({ "data": pending })))
}

pub async fn update_pending(
    State(state): State<AppState>,
    Path(key): Path<String>,
    _auth: AdminUser,
    Json(input): Json<UpdateMember>,
) -> Result<Json<serde_json::Value>, AppError> {
    let pending = db::pending::update_pending(&state.db, &key, &input).await?;
    Ok(Json(serde_json::json!({ "data": pending })))
}

pub async fn approve(
    State(state): State<AppState>,
    Path(key): Path<String>,
    _auth: AdminUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let member = db::approvals::approve(&state.db, &key).await?;
    Ok(Json(serde_json::json!({ "data": member })))
}

pub async fn reject(
    State(state): State<AppState>,
    Path(key): Path<String>,
    _auth: AdminUser,
) -> Result<Json<serde_json::Value>, AppError> {
    db::approvals::reject(&state.db, &key).await?;
    Ok(Json(serde_json::json!({ "data": null })))
}

/// Bulk approval. Always reports per-item outcomes so the caller can show
/// exactly which registrations transitioned.
pub async fn bulk_approve(
    State(state): State<AppState>,
    _auth: AdminUser,
    Json(input): Json<BulkRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if input.ids.is_empty() {
        return Err(AppError::BadRequest("no pending members selected".to_string()));
    }

    let (approved, failed) = db::approvals::bulk_approve(&state.db, &input.ids).await;
    Ok(Json(serde_json::json!({
        "data": { "approved": approved, "failed": failed }
    })))
}

pub async fn bulk_reject(
    State(state): State<AppState>,
    _auth: AdminUser,
    Json(input): Json<BulkRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if input.ids.is_empty() {
        return Err(AppError::BadRequest("no pending members selected".to_string()));
    }

    let (rejected, failed) = db::approvals::bulk_reject(&state.db, &input.ids).await;
    Ok(Json(serde_json::json!({
        "data": { "rejected": rejected, "failed": failed }
    })))
}
