mod auth;
mod events;
mod health;
mod intake;
mod members;
mod pending;
mod test_seed;
mod verify;

use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::rate_limit::rate_limit_middleware;
use crate::state::AppState;

/// Build the full application router. Consumes the state so middleware
/// layers that need `State<AppState>` (e.g. rate limiter) can be wired up.
pub fn router(state: AppState) -> Router {
    let api = api_routes(&state);

    // The intake endpoint keeps its historical path outside /api/v1 but
    // shares the API rate limit.
    let intake = Router::new()
        .route("/api/add-pending-member", post(intake::add_pending_member))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/test/seed", post(test_seed::seed))
        .route("/verify/{id}", get(verify::verify_page))
        .route("/verify/{id}/certificate.svg", get(verify::certificate_svg))
        .merge(intake)
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Auth (register is bootstrap-only, login is public, logout requires auth)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Public verification lookup
        .route("/verify/{id}", get(verify::verify_lookup))
        // Approved members (admin)
        .route(
            "/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/members/{id}",
            get(members::get_member)
                .patch(members::update_member)
                .delete(members::delete_member),
        )
        // Pending registrations and the approval workflow (admin)
        .route("/pending", get(pending::list_pending))
        .route("/pending/approve", post(pending::bulk_approve))
        .route("/pending/reject", post(pending::bulk_reject))
        .route(
            "/pending/{key}",
            axum::routing::patch(pending::update_pending).delete(pending::reject),
        )
        .route("/pending/{key}/approve", post(pending::approve))
        // Events (admin)
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        // Version
        .route("/version", get(health::version))
        // Rate limit on all API routes
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
}
