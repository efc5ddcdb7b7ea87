use axum::extract::{Path, State};
use axum::Json;

use crate::db;
use crate::error::AppError;
use crate::middleware::auth::AdminUser;
use crate::models::member::{CreateMember, UpdateMember};
use crate::state::AppState;

pub async fn list_members(
    State(state): State<AppState>,
    _auth: AdminUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let members = db::members::list_members(&state.db).await?;
    Ok(Json(serde_json::json!({ "data": members })))
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AdminUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let member = db::members::get_member(&state.db, &id).await?;
    Ok(Json(serde_json::json!({ "data": member })))
}

/// Direct admin creation of an approved member, bypassing the pending
/// queue. The verification ID still comes from the shared counter.
pub async fn create_member(
    State(state): State<AppState>,
    _auth: AdminUser,
    Json(input): Json<CreateMember>,
) -> Result<Json<serde_json::Value>, AppError> {
    for (name, value) in [
        ("userName", &input.user_name),
        ("fatherName", &input.father_name),
        ("cnic", &input.cnic),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!(
                "missing required field: {name}"
            )));
        }
    }

    let member = db::members::create_member(&state.db, &input).await?;
    Ok(Json(serde_json::json!({ "data": member })))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AdminUser,
    Json(input): Json<UpdateMember>,
) -> Result<Json<serde_json::Value>, AppError> {
    let member = db::members::update_member(&state.db, &id, &input).await?;
    Ok(Json(serde_json::json!({ "data": member })))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AdminUser,
) -> Result<Json<serde_json::Value>, AppError> {
    db::members::delete_member(&state.db, &id).await?;
    Ok(Json(serde_json::json!({ "data": null })))
}
