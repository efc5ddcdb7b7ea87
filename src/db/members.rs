use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::error::AppError;
use crate::member_id;
use crate::models::member::{CreateMember, Member, Role, UpdateMember};

const SELECT_MEMBERS: &str =
    "SELECT id, user_name, father_name, cnic, event, role, approved, created_at FROM members";

pub(crate) fn row_to_member(row: sqlx::sqlite::SqliteRow) -> Result<Member, AppError> {
    let role: String = row.get("role");
    let role = Role::from_str(&role)
        .map_err(|_| AppError::Internal(format!("invalid role in store: {role}")))?;

    Ok(Member {
        id: row.get("id"),
        user_name: row.get("user_name"),
        father_name: row.get("father_name"),
        cnic: row.get("cnic"),
        event: row.get("event"),
        role,
        approved: row.get("approved"),
        created_at: row.get("created_at"),
    })
}

/// Fetch an approved member by verification ID, case-insensitively.
/// Only the approved collection is consulted; pending registrations are
/// invisible here by construction.
pub async fn get_member(pool: &SqlitePool, id: &str) -> Result<Member, AppError> {
    let row = sqlx::query(&format!(
        "{SELECT_MEMBERS} WHERE id = ? COLLATE NOCASE AND approved = 1"
    ))
    .bind(id.trim())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("member not found".to_string()))?;

    row_to_member(row)
}

pub async fn list_members(pool: &SqlitePool) -> Result<Vec<Member>, AppError> {
    let rows = sqlx::query(&format!("{SELECT_MEMBERS} ORDER BY id ASC"))
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(row_to_member).collect()
}

/// Create an approved member directly (admin path). Allocates a fresh
/// verification ID through the same counter the approval workflow uses.
pub async fn create_member(pool: &SqlitePool, input: &CreateMember) -> Result<Member, AppError> {
    let mut tx = pool.begin().await?;

    let id = member_id::allocate(&mut tx).await?;
    sqlx::query(
        "INSERT INTO members (id, user_name, father_name, cnic, event, role, approved) VALUES (?, ?, ?, ?, ?, ?, 1)",
    )
    .bind(&id)
    .bind(&input.user_name)
    .bind(&input.father_name)
    .bind(&input.cnic)
    .bind(input.event.as_deref().unwrap_or(""))
    .bind(input.role.as_str())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_member(pool, &id).await
}

/// Apply a patch as one statement so no partial field writes are ever
/// visible. Identity and approval state are untouchable.
pub async fn update_member(
    pool: &SqlitePool,
    id: &str,
    input: &UpdateMember,
) -> Result<Member, AppError> {
    let result = sqlx::query(
        "UPDATE members SET \
             user_name = COALESCE(?, user_name), \
             father_name = COALESCE(?, father_name), \
             cnic = COALESCE(?, cnic), \
             event = COALESCE(?, event), \
             role = COALESCE(?, role) \
         WHERE id = ? COLLATE NOCASE",
    )
    .bind(&input.user_name)
    .bind(&input.father_name)
    .bind(&input.cnic)
    .bind(&input.event)
    .bind(input.role.map(|r| r.as_str()))
    .bind(id.trim())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("member not found".to_string()));
    }

    get_member(pool, id).await
}

/// Permanent removal. No tombstone: later verification lookups fail with
/// not-found, and the ID is never reissued (the counter does not go back).
pub async fn delete_member(pool: &SqlitePool, id: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM members WHERE id = ? COLLATE NOCASE")
        .bind(id.trim())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("member not found".to_string()));
    }
    Ok(())
}
