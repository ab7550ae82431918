use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// Liveness only; the upstream API is contacted exclusively by `/metrics`.
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
