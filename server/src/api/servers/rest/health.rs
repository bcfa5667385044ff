//! Liveness endpoint.

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::api::servers::app_state::AppState;

/// Reports the service name and whether the database answers a ping.
pub async fn check(State(state): State<AppState>) -> Json<Value> {
    let database_ok = state.db.ping().await.is_ok();
    Json(json!({
        "service": "pulse-api",
        "status": if database_ok { "healthy" } else { "degraded" },
        "database": database_ok,
        "timestamp": chrono::Utc::now(),
    }))
}
