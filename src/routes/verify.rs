use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::certificate::{format_date, xml_escape, CertificateView};
use crate::db;
use crate::error::AppError;
use crate::member_id;
use crate::models::event::Event;
use crate::models::member::Member;
use crate::state::AppState;

/// Resolve a candidate verification ID against the approved collection and
/// its event by name. Anything that does not have the ID shape is rejected
/// before touching the store. Pending registrations are invisible here, and
/// any backend failure collapses into the same miss as an unknown ID so the
/// public surface leaks nothing.
async fn lookup(state: &AppState, id: &str) -> Option<(Member, Option<Event>)> {
    member_id::parse(id)?;

    let member = match db::members::get_member(&state.db, id).await {
        Ok(m) => m,
        Err(AppError::NotFound(_)) => return None,
        Err(e) => {
            tracing::warn!("verification lookup failed for {id}: {e:?}");
            return None;
        }
    };

    let event = match db::events::get_event_by_name(&state.db, &member.event).await {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!("event resolution failed for {id}: {e:?}");
            None
        }
    };

    Some((member, event))
}

fn verification_url(state: &AppState, member_id: &str) -> String {
    format!("{}/verify/{member_id}", state.public_url)
}

/// JSON verification lookup. A miss is a uniform 404: it never
/// distinguishes "pending" from "never existed".
pub async fn verify_lookup(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (member, event) = lookup(&state, &id)
        .await
        .ok_or_else(|| AppError::NotFound("no record found".to_string()))?;

    Ok(Json(serde_json::json!({
        "data": { "member": member, "event": event }
    })))
}

/// Server-rendered public verification page.
pub async fn verify_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match lookup(&state, &id).await {
        Some((member, event)) => {
            Html(render_success_page(&member, event.as_ref())).into_response()
        }
        None => (StatusCode::NOT_FOUND, Html(render_failure_page(&id))).into_response(),
    }
}

/// Standalone downloadable certificate image.
pub async fn certificate_svg(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some((member, event)) = lookup(&state, &id).await else {
        return AppError::NotFound("no record found".to_string()).into_response();
    };

    let url = verification_url(&state, &member.id);
    let svg = CertificateView::new(&member, event.as_ref(), &url).render_svg();

    (
        [
            (header::CONTENT_TYPE, "image/svg+xml".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"GreenPass_Certificate_{}.svg\"",
                    member.id
                ),
            ),
        ],
        svg,
    )
        .into_response()
}

const PAGE_STYLE: &str = r#"
  body { font-family: Georgia, serif; background: #eef5ee; margin: 0; padding: 40px 16px; color: #1f2d24; }
  .card { max-width: 760px; margin: 0 auto; background: #fff; border: 1px solid #cfe0cf; border-radius: 10px; padding: 32px; }
  .card h1 { text-align: center; margin-top: 0; }
  .status { text-align: center; font-size: 48px; }
  .ok { color: #2f7d46; }
  .fail { color: #b3362c; }
  .detail { display: flex; justify-content: space-between; border-bottom: 1px solid #eee; padding: 6px 0; }
  .detail .label { color: #667; }
  .columns { display: flex; gap: 24px; flex-wrap: wrap; }
  .columns > div { flex: 1; min-width: 260px; }
  .cert { text-align: center; margin-top: 24px; }
  .cert img { max-width: 100%; border: 1px solid #cfe0cf; border-radius: 6px; }
  .actions { text-align: center; margin-top: 24px; }
  .actions a { display: inline-block; margin: 0 8px; padding: 10px 18px; border-radius: 6px; background: #2f7d46; color: #fff; text-decoration: none; }
  .actions a.secondary { background: #fff; color: #2f7d46; border: 1px solid #2f7d46; }
"#;

fn detail(label: &str, value: &str) -> String {
    format!(
        r#"<div class="detail"><span class="label">{}</span><span>{}</span></div>"#,
        xml_escape(label),
        xml_escape(value)
    )
}

fn render_success_page(member: &Member, event: Option<&Event>) -> String {
    let event_name = event.map(|e| e.name.as_str()).unwrap_or("N/A");
    let event_date = event.map(|e| format_date(&e.date)).unwrap_or_else(|| "N/A".to_string());
    let organized_by = event.map(|e| e.organized_by.as_str()).unwrap_or("N/A");
    let cert_path = format!("/verify/{}/certificate.svg", member.id);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Verified — {id}</title>
<style>{PAGE_STYLE}</style>
</head>
<body>
<div class="card">
  <div class="status ok">&#10004;</div>
  <h1>Verification Successful</h1>
  <p style="text-align:center">This certificate is authentic and verified.</p>
  <div class="columns">
    <div>
      <h2>Member Details</h2>
      {name}{father}{cnic}{vid}
    </div>
    <div>
      <h2>Event Details</h2>
      {event}{date}{role}{org}
    </div>
  </div>
  <div class="cert">
    <h2>Digital Certificate</h2>
    <img src="{cert_path}" alt="Certificate for {id}">
  </div>
  <div class="actions">
    <a href="{cert_path}" download>Download Certificate</a>
    <a class="secondary" href="/">Back to Homepage</a>
  </div>
</div>
</body>
</html>
"#,
        id = xml_escape(&member.id),
        name = detail("Name", &member.user_name),
        father = detail("Father's Name", &member.father_name),
        cnic = detail("CNIC", &member.cnic),
        vid = detail("Verification ID", &member.id),
        event = detail("Event", event_name),
        date = detail("Date", &event_date),
        role = detail("Role", member.role.as_str()),
        org = detail("Organized By", organized_by),
        cert_path = xml_escape(&cert_path),
        PAGE_STYLE = PAGE_STYLE,
    )
}

fn render_failure_page(id: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Verification Failed</title>
<style>{PAGE_STYLE}</style>
</head>
<body>
<div class="card">
  <div class="status fail">&#10008;</div>
  <h1>Verification Failed</h1>
  <p style="text-align:center">No record found for ID: <strong>{id}</strong></p>
  <div class="actions">
    <a href="/">Go to Homepage</a>
  </div>
</div>
</body>
</html>
"#,
        id = xml_escape(id),
        PAGE_STYLE = PAGE_STYLE,
    )
}
