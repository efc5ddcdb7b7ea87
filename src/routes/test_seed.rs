use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::middleware::auth::{create_token_hash, generate_token};
use crate::models::member::CreateMember;
use crate::models::member::Role;
use crate::state::AppState;

/// Provision a known admin, event, approved member and pending registration
/// for end-to-end test harnesses. Hidden (404) unless test mode is on.
pub async fn seed(State(state): State<AppState>) -> impl IntoResponse {
    if !state.test_mode {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": {
                    "code": "not_found",
                    "message": "not found"
                }
            })),
        );
    }

    match do_seed(&state).await {
        Ok(data) => (StatusCode::OK, Json(json!({ "data": data }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": {
                    "code": "seed_failed",
                    "message": format!("{e:?}")
                }
            })),
        ),
    }
}

async fn do_seed(state: &AppState) -> Result<serde_json::Value, AppError> {
    let pool = &state.db;

    // 1. Find or create the test admin, then rotate its token
    let admin_id = find_or_create_admin(pool, "test_admin").await?;

    sqlx::query("DELETE FROM admin_tokens WHERE admin_id = ?")
        .bind(&admin_id)
        .execute(pool)
        .await?;

    let token = generate_token();
    sqlx::query(
        "INSERT INTO admin_tokens (token_hash, admin_id, expires_at) VALUES (?, ?, '2099-12-31T23:59:59')",
    )
    .bind(create_token_hash(&token))
    .bind(&admin_id)
    .execute(pool)
    .await?;

    // 2. Find or create the test event
    let event = match db::events::get_event_by_name(pool, "Test Event").await? {
        Some(event) => event,
        None => {
            db::events::create_event(
                pool,
                &crate::models::event::CreateEvent {
                    name: "Test Event".to_string(),
                    organized_by: "Green Environmental Society".to_string(),
                    date: "2024-01-01".to_string(),
                    purpose: Some("Harness fixture".to_string()),
                    certificate_url: None,
                    certificate_background_color: None,
                    certificate_text_color: None,
                    organizer_sign_url: None,
                    qr_code_url: None,
                },
            )
            .await?
        }
    };

    // 3. Ensure an approved member exists for verification checks
    let member = find_or_create_member(pool, "Test Member", &event.name).await?;

    // 4. Always file a fresh pending registration for the approval flow
    let pending = db::pending::insert_pending(
        pool,
        "Test Pending",
        "Test Father",
        "00000-0000000-0",
        Role::Participant,
        Some(&event.name),
    )
    .await?;

    Ok(json!({
        "admin": {
            "id": admin_id,
            "username": "test_admin",
            "token": token,
            "token_type": "Bearer"
        },
        "event": { "id": event.id, "name": event.name },
        "member": { "id": member.id, "userName": member.user_name },
        "pending": { "id": pending.key }
    }))
}

async fn find_or_create_admin(pool: &SqlitePool, username: &str) -> Result<String, AppError> {
    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM admins WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    match existing {
        Some(id) => Ok(id),
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            // Bearer-token auth only; this account has no usable password.
            sqlx::query("INSERT INTO admins (id, username, password_hash) VALUES (?, ?, 'unusable')")
                .bind(&id)
                .bind(username)
                .execute(pool)
                .await?;
            Ok(id)
        }
    }
}

async fn find_or_create_member(
    pool: &SqlitePool,
    user_name: &str,
    event: &str,
) -> Result<crate::models::member::Member, AppError> {
    let existing: Option<String> =
        sqlx::query_scalar("SELECT id FROM members WHERE user_name = ?")
            .bind(user_name)
            .fetch_optional(pool)
            .await?;

    match existing {
        Some(id) => db::members::get_member(pool, &id).await,
        None => {
            db::members::create_member(
                pool,
                &CreateMember {
                    user_name: user_name.to_string(),
                    father_name: "Test Father".to_string(),
                    cnic: "00000-0000000-0".to_string(),
                    role: Role::Participant,
                    event: Some(event.to_string()),
                },
            )
            .await
        }
    }
}
