mod auth;

pub use auth::{AuthUser, CurrentSession, auth_middleware};
