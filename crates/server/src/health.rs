use axum::{Json, response::IntoResponse};
use serde_json::json;

pub(crate) async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}
