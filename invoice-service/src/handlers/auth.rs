use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::dtos::auth::{LoginRequest, LoginResponse};
use crate::middleware::AuthUser;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// Open a session with username and password.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.auth.login(&req.username, &req.password)?;
    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token: session.token,
            username: session.username,
        }),
    ))
}

/// Revoke the session behind the presented bearer token.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    state.auth.logout(&user.0.token);
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Logged out successfully"
        })),
    ))
}
