use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::auth::{create_token_hash, generate_token, AdminUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Bootstrap registration: the first account created becomes the admin.
/// Once any admin exists, registration is closed.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let username = input.username.trim();
    if username.is_empty() || username.len() > 32 {
        return Err(AppError::BadRequest(
            "username must be between 1 and 32 characters".to_string(),
        ));
    }

    if input.password.len() < 8 || input.password.len() > 128 {
        return Err(AppError::BadRequest(
            "password must be between 8 and 128 characters".to_string(),
        ));
    }

    let admin_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(&state.db)
        .await
        .map_err(AppError::from)?;

    if admin_count > 0 {
        return Err(AppError::Forbidden(
            "registration is closed".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(input.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?
        .to_string();

    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO admins (id, username, password_hash) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(username)
        .bind(&password_hash)
        .execute(&state.db)
        .await
        .map_err(AppError::from)?;

    let token = issue_token(&state, &id).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "admin": { "id": id, "username": username },
            "token": token
        }
    })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT id, password_hash FROM admins WHERE username = ?",
    )
    .bind(input.username.trim())
    .fetch_optional(&state.db)
    .await
    .map_err(AppError::from)?;

    let (admin_id, stored_hash) = match row {
        Some(r) => r,
        None => {
            return Err(AppError::Unauthorized("invalid credentials".to_string()));
        }
    };

    let parsed_hash = PasswordHash::new(&stored_hash)
        .map_err(|e| AppError::Internal(format!("stored hash parse failed: {e}")))?;

    if Argon2::default()
        .verify_password(input.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    }

    let token = issue_token(&state, &admin_id).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "admin": { "id": admin_id, "username": input.username.trim() },
            "token": token
        }
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    _auth: AdminUser,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    // Hash the presented token to revoke exactly that session.
    let auth_header = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let raw_token = auth_header.strip_prefix("Bearer ").unwrap_or("");
    let token_hash = create_token_hash(raw_token);

    sqlx::query("DELETE FROM admin_tokens WHERE token_hash = ?")
        .bind(&token_hash)
        .execute(&state.db)
        .await
        .map_err(AppError::from)?;

    Ok(Json(serde_json::json!({
        "data": { "ok": true }
    })))
}

/// Mint a bearer token with a 30-day expiry and store its hash.
async fn issue_token(state: &AppState, admin_id: &str) -> Result<String, AppError> {
    let token = generate_token();
    let token_hash = create_token_hash(&token);
    let expires_at = (chrono::Utc::now() + chrono::Duration::days(30))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();

    sqlx::query("INSERT INTO admin_tokens (token_hash, admin_id, expires_at) VALUES (?, ?, ?)")
        .bind(&token_hash)
        .bind(admin_id)
        .bind(&expires_at)
        .execute(&state.db)
        .await
        .map_err(AppError::from)?;

    Ok(token)
}
