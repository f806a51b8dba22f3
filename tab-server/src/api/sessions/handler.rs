//! Session API Handlers

use axum::{Json, extract::State, http::StatusCode};
use shared::request::{OpenSessionRequest, SessionResponse};

use crate::core::ServerState;
use crate::orders::Upserted;
use crate::utils::{ApiJson, AppResult};

/// Open or resume the table's session (201 new / 200 resumed)
pub async fn open(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<OpenSessionRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let result = state
        .orders
        .get_or_create_session(payload.table_number, &payload.restaurant_id)?;

    let (status, session) = match result {
        Upserted::Created(session) => (StatusCode::CREATED, session),
        Upserted::Existing(session) => (StatusCode::OK, session),
    };
    Ok((status, Json(SessionResponse::from(&session))))
}
