//! Request and response payloads for the HTTP API.

pub mod auth;
pub mod invoice;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
