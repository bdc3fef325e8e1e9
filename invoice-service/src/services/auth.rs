//! Session-based authentication gate.
//!
//! A single administrator account configured at startup. Password
//! verification compares SHA-256 digests in constant time; sessions are
//! opaque random tokens with a TTL, revoked on logout.

use crate::config::AdminConfig;
use crate::services::metrics::LOGINS_TOTAL;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use service_core::error::AppError;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::info;
use uuid::Uuid;

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Token handed back to the client on login.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub username: String,
}

pub struct AuthService {
    username: String,
    password_digest: [u8; 32],
    session_ttl: Duration,
    sessions: DashMap<String, Session>,
}

impl AuthService {
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            username: config.username.clone(),
            password_digest: Sha256::digest(config.password.as_bytes()).into(),
            session_ttl: Duration::hours(config.session_ttl_hours),
            sessions: DashMap::new(),
        }
    }

    /// Verify credentials and open a session.
    pub fn login(&self, username: &str, password: &str) -> Result<SessionToken, AppError> {
        let digest: [u8; 32] = Sha256::digest(password.as_bytes()).into();
        let password_ok: bool = digest.ct_eq(&self.password_digest).into();
        let username_ok = username == self.username;

        if !(username_ok && password_ok) {
            LOGINS_TOTAL.with_label_values(&["rejected"]).inc();
            return Err(AppError::Unauthorized(anyhow::anyhow!(
                "Invalid username or password"
            )));
        }

        let token = Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                username: username.to_string(),
                created_at: Utc::now(),
            },
        );
        LOGINS_TOTAL.with_label_values(&["accepted"]).inc();
        info!(username = %username, "User logged in");

        Ok(SessionToken {
            token,
            username: username.to_string(),
        })
    }

    /// Revoke a session. Returns whether the token was live.
    pub fn logout(&self, token: &str) -> bool {
        let removed = self.sessions.remove(token).is_some();
        if removed {
            info!("Session revoked");
        }
        removed
    }

    /// Look up a live, unexpired session for a bearer token.
    pub fn validate(&self, token: &str) -> Option<Session> {
        let expired = {
            let entry = self.sessions.get(token)?;
            if Utc::now() - entry.created_at > self.session_ttl {
                true
            } else {
                return Some(entry.clone());
            }
        };
        if expired {
            self.sessions.remove(token);
        }
        None
    }
}
