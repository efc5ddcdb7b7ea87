use sqlx::{Row, SqlitePool};

use crate::error::AppError;
use crate::models::event::{CreateEvent, Event, UpdateEvent};

const SELECT_EVENTS: &str = "SELECT id, name, organized_by, date, purpose, certificate_url, certificate_background_color, certificate_text_color, organizer_sign_url, qr_code_url FROM events";

fn row_to_event(row: sqlx::sqlite::SqliteRow) -> Event {
    Event {
        id: row.get("id"),
        name: row.get("name"),
        organized_by: row.get("organized_by"),
        date: row.get("date"),
        purpose: row.get("purpose"),
        certificate_url: row.get("certificate_url"),
        certificate_background_color: row.get("certificate_background_color"),
        certificate_text_color: row.get("certificate_text_color"),
        organizer_sign_url: row.get("organizer_sign_url"),
        qr_code_url: row.get("qr_code_url"),
    }
}

pub async fn create_event(pool: &SqlitePool, input: &CreateEvent) -> Result<Event, AppError> {
    let id = uuid::Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO events (id, name, organized_by, date, purpose, certificate_url, certificate_background_color, certificate_text_color, organizer_sign_url, qr_code_url) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&input.name)
    .bind(&input.organized_by)
    .bind(&input.date)
    .bind(&input.purpose)
    .bind(&input.certificate_url)
    .bind(&input.certificate_background_color)
    .bind(&input.certificate_text_color)
    .bind(&input.organizer_sign_url)
    .bind(&input.qr_code_url)
    .execute(pool)
    .await?;

    get_event(pool, &id).await
}

pub async fn get_event(pool: &SqlitePool, id: &str) -> Result<Event, AppError> {
    let row = sqlx::query(&format!("{SELECT_EVENTS} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("event not found".to_string()))?;

    Ok(row_to_event(row))
}

/// Resolve an event by name, first match wins. Event names are assumed
/// unique for this purpose; the schema does not enforce it.
pub async fn get_event_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Event>, AppError> {
    if name.is_empty() {
        return Ok(None);
    }

    let row = sqlx::query(&format!(
        "{SELECT_EVENTS} WHERE name = ? ORDER BY created_at ASC LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_event))
}

pub async fn list_events(pool: &SqlitePool) -> Result<Vec<Event>, AppError> {
    let rows = sqlx::query(&format!("{SELECT_EVENTS} ORDER BY date ASC, name ASC"))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(row_to_event).collect())
}

pub async fn update_event(
    pool: &SqlitePool,
    id: &str,
    input: &UpdateEvent,
) -> Result<Event, AppError> {
    let result = sqlx::query(
        "UPDATE events SET \
             name = COALESCE(?, name), \
             organized_by = COALESCE(?, organized_by), \
             date = COALESCE(?, date), \
             purpose = COALESCE(?, purpose), \
             certificate_url = COALESCE(?, certificate_url), \
             certificate_background_color = COALESCE(?, certificate_background_color), \
             certificate_text_color = COALESCE(?, certificate_text_color), \
             organizer_sign_url = COALESCE(?, organizer_sign_url), \
             qr_code_url = COALESCE(?, qr_code_url) \
         WHERE id = ?",
    )
    .bind(&input.name)
    .bind(&input.organized_by)
    .bind(&input.date)
    .bind(&input.purpose)
    .bind(&input.certificate_url)
    .bind(&input.certificate_background_color)
    .bind(&input.certificate_text_color)
    .bind(&input.organizer_sign_url)
    .bind(&input.qr_code_url)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("event not found".to_string()));
    }

    get_event(pool, id).await
}

/// Deleting an event does not cascade to members; referencing members keep
/// the event name and verify with an unresolved event.
pub async fn delete_event(pool: &SqlitePool, id: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("event not found".to_string()));
    }
    Ok(())
}
