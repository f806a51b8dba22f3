//! Session API Module
//!
//! A guest device scans the table code and opens (or resumes) the table's
//! session before ordering.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Session router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/session", post(handler::open))
}
