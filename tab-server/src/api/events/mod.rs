//! Change feed API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/restaurants/{restaurantId}/events | GET | SSE 订单变更流 |
//!
//! Each SSE message is named after the event kind (`ORDER_CREATED`,
//! `ITEM_STATUS_CHANGED`, ...) and carries the event JSON. A subscriber that
//! falls behind receives one `LAGGED` message and keeps streaming; it should
//! re-poll the order list to catch up.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Change feed router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/restaurants/{id}/events", get(handler::stream))
}
