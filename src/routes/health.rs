use axum::Json;

pub async fn health() -> &'static str {
    "ok"
}

/// Build identity for deployed instances: crate name, release version and
/// the short commit the binary was built from.
pub async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "data": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "build": env!("GIT_SHA"),
        }
    }))
}
