use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::db;
use crate::error::AppError;
use crate::models::member::Role;
use crate::state::AppState;

/// Pull a required, non-blank string field out of the submission.
fn required_field(body: &serde_json::Value, name: &str) -> Result<String, AppError> {
    body.get(name)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest(format!("missing required field: {name}")))
}

/// Public registration intake. Accepts `{userName, fatherName, cnic, role,
/// event?}` and files the submission into the pending collection under a
/// system-generated key. The event is optional at intake; an admin can
/// assign or change it before approval.
pub async fn add_pending_member(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let user_name = required_field(&body, "userName")?;
    let father_name = required_field(&body, "fatherName")?;
    let cnic = required_field(&body, "cnic")?;
    let role: Role = required_field(&body, "role")?.parse().map_err(|_| {
        AppError::BadRequest(
            "role must be one of Participant, Volunteer, Organizer, Supervisor".to_string(),
        )
    })?;

    let event = body
        .get("event")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let pending = db::pending::insert_pending(
        &state.db,
        &user_name,
        &father_name,
        &cnic,
        role,
        event,
    )
    .await?;

    tracing::debug!("new pending registration {}", pending.key);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Pending member added successfully",
            "id": pending.key
        })),
    ))
}
