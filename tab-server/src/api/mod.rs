//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`sessions`] - 桌台会话 (扫码入座)
//! - [`orders`] - 下单、厨房状态、修改、关单、支付、删除
//! - [`events`] - 变更事件推送 (SSE)

pub mod events;
pub mod health;
pub mod orders;
pub mod sessions;

use axum::Router;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API
        .merge(health::router())
        // Guest API
        .merge(sessions::router())
        // Order API (guest, kitchen, operator)
        .merge(orders::router())
        // Change feed
        .merge(events::router())
}

/// Build a fully configured application with all middleware and state
///
/// Used by the HTTP server and by tests driving the router directly
pub fn build_app(state: &ServerState) -> Router {
    build_router()
        .with_state(state.clone())
        // ========== Tower HTTP Middleware ==========
        // Timeout - bounds time to response headers (SSE bodies stream on)
        .layer(TimeoutLayer::new(Duration::from_millis(
            state.config.request_timeout_ms,
        )))
        // CORS - guest, kitchen and operator pages are served elsewhere
        .layer(CorsLayer::permissive())
        // Trace - Request tracing
        .layer(TraceLayer::new_for_http())
}
