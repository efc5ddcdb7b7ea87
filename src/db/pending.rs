use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::error::AppError;
use crate::models::member::{PendingMember, Role, UpdateMember};

const SELECT_PENDING: &str =
    "SELECT key, user_name, father_name, cnic, event, role, submitted_at FROM pending_members";

fn row_to_pending(row: sqlx::sqlite::SqliteRow) -> Result<PendingMember, AppError> {
    let role: String = row.get("role");
    let role = Role::from_str(&role)
        .map_err(|_| AppError::Internal(format!("invalid role in store: {role}")))?;

    Ok(PendingMember {
        key: row.get("key"),
        user_name: row.get("user_name"),
        father_name: row.get("father_name"),
        cnic: row.get("cnic"),
        event: row.get("event"),
        role,
        submitted_at: row.get("submitted_at"),
    })
}

/// Persist a new registration under a fresh opaque key and return it.
pub async fn insert_pending(
    pool: &SqlitePool,
    user_name: &str,
    father_name: &str,
    cnic: &str,
    role: Role,
    event: Option<&str>,
) -> Result<PendingMember, AppError> {
    let key = uuid::Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO pending_members (key, user_name, father_name, cnic, event, role) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&key)
    .bind(user_name)
    .bind(father_name)
    .bind(cnic)
    .bind(event.unwrap_or(""))
    .bind(role.as_str())
    .execute(pool)
    .await?;

    get_pending(pool, &key).await
}

pub async fn get_pending(pool: &SqlitePool, key: &str) -> Result<PendingMember, AppError> {
    let row = sqlx::query(&format!("{SELECT_PENDING} WHERE key = ?"))
        .bind(key)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("pending member not found".to_string()))?;

    row_to_pending(row)
}

pub async fn list_pending(pool: &SqlitePool) -> Result<Vec<PendingMember>, AppError> {
    let rows = sqlx::query(&format!("{SELECT_PENDING} ORDER BY submitted_at ASC, key ASC"))
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(row_to_pending).collect()
}

/// Edit-in-place for a pending registration; the storage key never changes.
/// One statement, so a failed patch leaves nothing half-written.
pub async fn update_pending(
    pool: &SqlitePool,
    key: &str,
    input: &UpdateMember,
) -> Result<PendingMember, AppError> {
    let result = sqlx::query(
        "UPDATE pending_members SET \
             user_name = COALESCE(?, user_name), \
             father_name = COALESCE(?, father_name), \
             cnic = COALESCE(?, cnic), \
             event = COALESCE(?, event), \
             role = COALESCE(?, role) \
         WHERE key = ?",
    )
    .bind(&input.user_name)
    .bind(&input.father_name)
    .bind(&input.cnic)
    .bind(&input.event)
    .bind(input.role.map(|r| r.as_str()))
    .bind(key)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("pending member not found".to_string()));
    }

    get_pending(pool, key).await
}

pub async fn delete_pending(pool: &SqlitePool, key: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM pending_members WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("pending member not found".to_string()));
    }
    Ok(())
}
