#![allow(dead_code)]

use axum::body::Body;
use dashmap::DashMap;
use greenpass::db;
use greenpass::middleware::auth::{create_token_hash, generate_token};
use greenpass::models::event::CreateEvent;
use greenpass::models::member::Role;
use greenpass::routes;
use greenpass::state::AppState;
use http::{Method, Request};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

/// An admin account created for testing, bundling its bearer token.
pub struct TestAdmin {
    pub admin_id: String,
    pub token: String,
}

impl TestAdmin {
    /// Returns the Authorization header value (`"Bearer xxx"`).
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Test server that owns an in-memory SQLite pool and full AppState.
/// Each instance is isolated — safe for parallel tests.
pub struct TestServer {
    pub state: AppState,
}

impl TestServer {
    /// Create a new TestServer with an in-memory SQLite database. The pool
    /// is capped at one connection: each connection to `:memory:` opens its
    /// own database, so a single shared connection keeps every query (and
    /// the migrations) on the same one.
    pub async fn new() -> Self {
        Self::with_test_mode(true).await
    }

    pub async fn with_test_mode(test_mode: bool) -> Self {
        // Pool setup runs on its own thread with a real-time runtime: under
        // `start_paused` tests, tokio auto-advances the paused clock while the
        // SQLite worker thread is busy, which fires the pool's acquire timeout
        // before the connection can be established. The connections themselves
        // live on sqlx's dedicated OS thread, so the pool stays usable here.
        let pool = std::thread::spawn(|| {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build setup runtime")
                .block_on(async {
                    let options = SqliteConnectOptions::from_str("sqlite::memory:")
                        .expect("invalid test database url")
                        .foreign_keys(true);
                    let pool = SqlitePoolOptions::new()
                        .max_connections(1)
                        .idle_timeout(None)
                        .max_lifetime(None)
                        .connect_with(options)
                        .await
                        .expect("failed to create test pool");
                    sqlx::migrate!()
                        .run(&pool)
                        .await
                        .expect("failed to run migrations");
                    // Connections are returned to the pool by a spawned task;
                    // wait for the migrated connection to land back in the
                    // idle set before this runtime is dropped, or it would be
                    // discarded along with the in-memory database.
                    while pool.num_idle() == 0 {
                        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                    }
                    pool
                })
        })
        .join()
        .expect("test pool setup thread panicked");

        let state = AppState {
            db: pool,
            public_url: "http://localhost".to_string(),
            test_mode,
            rate_limits: Arc::new(DashMap::new()),
        };

        Self { state }
    }

    /// Returns an Axum Router wired to this server's state for `oneshot()` calls.
    pub fn router(&self) -> axum::Router {
        routes::router(self.state.clone())
    }

    /// Returns a reference to the underlying SQLite pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.state.db
    }

    /// Create an admin and insert a bearer token with far-future expiry.
    pub async fn create_admin_with_token(&self, username: &str) -> TestAdmin {
        let admin_id = uuid::Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO admins (id, username, password_hash) VALUES (?, ?, 'unused')")
            .bind(&admin_id)
            .bind(username)
            .execute(self.pool())
            .await
            .expect("failed to create test admin");

        let token = generate_token();
        let token_hash = create_token_hash(&token);

        sqlx::query(
            "INSERT INTO admin_tokens (token_hash, admin_id, expires_at) VALUES (?, ?, '2099-12-31T23:59:59')",
        )
        .bind(&token_hash)
        .bind(&admin_id)
        .execute(self.pool())
        .await
        .expect("failed to insert test token");

        TestAdmin { admin_id, token }
    }

    /// Create an event via the DB. Returns the event ID.
    pub async fn create_event(&self, name: &str, date: &str, organized_by: &str) -> String {
        let event = db::events::create_event(
            self.pool(),
            &CreateEvent {
                name: name.to_string(),
                organized_by: organized_by.to_string(),
                date: date.to_string(),
                purpose: None,
                certificate_url: None,
                certificate_background_color: None,
                certificate_text_color: None,
                organizer_sign_url: None,
                qr_code_url: None,
            },
        )
        .await
        .expect("failed to create test event");
        event.id
    }

    /// File a pending registration via the DB. Returns the storage key.
    pub async fn create_pending(&self, user_name: &str, role: Role, event: Option<&str>) -> String {
        let pending = db::pending::insert_pending(
            self.pool(),
            user_name,
            "Test Father",
            "11111-1111111-1",
            role,
            event,
        )
        .await
        .expect("failed to create test pending member");
        pending.key
    }
}

// ---------------------------------------------------------------------------
// Request builder helpers
// ---------------------------------------------------------------------------

/// Build an unauthenticated request with no body.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build an authenticated request with no body.
pub fn authenticated_request(method: Method, uri: &str, auth_header: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", auth_header)
        .body(Body::empty())
        .unwrap()
}

/// Build an authenticated request with a JSON body.
pub fn authenticated_json_request(
    method: Method,
    uri: &str,
    auth_header: &str,
    body: &serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", auth_header)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Build an unauthenticated request with a JSON body.
pub fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Parse a response body into a `serde_json::Value`.
pub async fn parse_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as a UTF-8 string.
pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
