use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::startup::AppState;

/// The session behind the current request, injected by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: String,
    pub username: String,
}

/// Middleware to require a live session on protected routes.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|value| value.to_string())
        .ok_or_else(|| {
            AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
        })?;

    let session = state.auth.validate(&token).ok_or_else(|| {
        AppError::Unauthorized(anyhow::anyhow!("Invalid or expired session token"))
    })?;

    req.extensions_mut().insert(CurrentSession {
        token: token.to_string(),
        username: session.username,
    });

    Ok(next.run(req).await)
}

/// Extractor to easily get the session in handlers.
pub struct AuthUser(pub CurrentSession);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<CurrentSession>().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Session missing from request extensions"
            ))
        })?;

        Ok(AuthUser(session.clone()))
    }
}
