use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::startup::AppState;

/// Static company letterhead plus the display currency, for document
/// renderers.
pub async fn company_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "company": state.config.company,
        "currency": state.config.defaults.currency,
    }))
}
