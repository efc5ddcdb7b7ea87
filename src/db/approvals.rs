//! The approval workflow: promotion of pending registrations to approved
//! members, rejection, and the bulk variants.
//!
//! Promotion is transactional end to end: counter bump, member insert and
//! pending delete either all land or none do. A unique-constraint hit on
//! the member ID aborts the transaction and surfaces as a retryable
//! conflict with the pending record untouched.

use futures_util::future::join_all;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::member_id;
use crate::models::member::Member;

/// Per-item failure inside a bulk operation.
#[derive(Debug, Serialize)]
pub struct BulkFailure {
    pub id: String,
    pub error: String,
}

/// Promote one pending registration to an approved member.
pub async fn approve(pool: &SqlitePool, key: &str) -> Result<Member, AppError> {
    let pending = db::pending::get_pending(pool, key).await?;

    let mut tx = pool.begin().await?;

    let id = member_id::allocate(&mut tx).await?;

    sqlx::query(
        "INSERT INTO members (id, user_name, father_name, cnic, event, role, approved) VALUES (?, ?, ?, ?, ?, ?, 1)",
    )
    .bind(&id)
    .bind(&pending.user_name)
    .bind(&pending.father_name)
    .bind(&pending.cnic)
    .bind(&pending.event)
    .bind(pending.role.as_str())
    .execute(&mut *tx)
    .await?;

    let deleted = sqlx::query("DELETE FROM pending_members WHERE key = ?")
        .bind(key)
        .execute(&mut *tx)
        .await?;

    // The record vanished between the read and the delete; another admin
    // already acted on it. Roll back rather than minting a duplicate.
    if deleted.rows_affected() == 0 {
        return Err(AppError::Conflict(
            "pending member already processed".to_string(),
        ));
    }

    tx.commit().await?;

    tracing::info!(member_id = %id, "approved pending member {key}");
    db::members::get_member(pool, &id).await
}

/// Delete a pending registration without creating a member.
pub async fn reject(pool: &SqlitePool, key: &str) -> Result<(), AppError> {
    db::pending::delete_pending(pool, key).await?;
    tracing::info!("rejected pending member {key}");
    Ok(())
}

/// Approve each key, fire-and-collect. A failure on one record never stops
/// the others; the caller gets an exact account of what transitioned.
pub async fn bulk_approve(
    pool: &SqlitePool,
    keys: &[String],
) -> (Vec<Member>, Vec<BulkFailure>) {
    let results = join_all(keys.iter().map(|key| async move {
        (key.clone(), approve(pool, key).await)
    }))
    .await;

    let mut approved = Vec::new();
    let mut failed = Vec::new();
    for (key, result) in results {
        match result {
            Ok(member) => approved.push(member),
            Err(e) => failed.push(BulkFailure {
                id: key,
                error: e.message(),
            }),
        }
    }
    (approved, failed)
}

pub async fn bulk_reject(pool: &SqlitePool, keys: &[String]) -> (Vec<String>, Vec<BulkFailure>) {
    let results = join_all(keys.iter().map(|key| async move {
        (key.clone(), reject(pool, key).await)
    }))
    .await;

    let mut rejected = Vec::new();
    let mut failed = Vec::new();
    for (key, result) in results {
        match result {
            Ok(()) => rejected.push(key),
            Err(e) => failed.push(BulkFailure {
                id: key,
                error: e.message(),
            }),
        }
    }
    (rejected, failed)
}
