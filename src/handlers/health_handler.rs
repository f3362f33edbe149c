use axum::Json;

/// Liveness probe; does not touch the upstream API.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "assessment-relay",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
