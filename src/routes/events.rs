use axum::extract::{Path, State};
use axum::Json;

use crate::db;
use crate::error::AppError;
use crate::middleware::auth::AdminUser;
use crate::models::event::{CreateEvent, UpdateEvent};
use crate::state::AppState;

pub async fn list_events(
    State(state): State<AppState>,
    _auth: AdminUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let events = db::events::list_events(&state.db).await?;
    Ok(Json(serde_json::json!({ "data": events })))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AdminUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let event = db::events::get_event(&state.db, &id).await?;
    Ok(Json(serde_json::json!({ "data": event })))
}

pub async fn create_event(
    State(state): State<AppState>,
    _auth: AdminUser,
    Json(input): Json<CreateEvent>,
) -> Result<Json<serde_json::Value>, AppError> {
    for (name, value) in [
        ("name", &input.name),
        ("organizedBy", &input.organized_by),
        ("date", &input.date),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!(
                "missing required field: {name}"
            )));
        }
    }

    let event = db::events::create_event(&state.db, &input).await?;
    Ok(Json(serde_json::json!({ "data": event })))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AdminUser,
    Json(input): Json<UpdateEvent>,
) -> Result<Json<serde_json::Value>, AppError> {
    let event = db::events::update_event(&state.db, &id, &input).await?;
    Ok(Json(serde_json::json!({ "data": event })))
}

/// Event deletion orphans referencing members on purpose; their
/// certificates keep rendering with an unresolved event.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AdminUser,
) -> Result<Json<serde_json::Value>, AppError> {
    db::events::delete_event(&state.db, &id).await?;
    Ok(Json(serde_json::json!({ "data": null })))
}
