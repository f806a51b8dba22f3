//! Order API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/order | POST | 提交菜品 (201 新建 / 200 合并) |
//! | /api/order/parcel | POST | 外带订单 |
//! | /api/order/{restaurantId}/{tableNumber} | GET | 桌台当前订单 |
//! | /api/order/id/{orderId} | GET | 按 ID 查询 |
//! | /api/order/{orderId} | PATCH | 修改 (bulkEdit/addItem/editItem/removeItem) |
//! | /api/order/{orderId} | DELETE | 删除订单及会话 |
//! | /api/order/complete/{orderId} | PUT | 关单 (不付款) |
//! | /api/order/pay/{orderId} | PUT | 付款并关单 |
//! | /api/orders/{restaurantId} | GET | 订单列表 (?status=Active\|Closed) |
//! | /api/orders/{orderId}/{lineId} | PUT | 单项厨房状态 |
//! | /api/orders/{orderId}/items/status | PUT | 批量推进厨房状态 |
//!
//! Segments sharing a position share a parameter name (`{id}`); the
//! handlers extract by position. The static segments `id`, `complete`, `pay`
//! and `parcel` win over `{restaurantId}`, so those restaurant ids are
//! refused when a session is opened
//! ([`RESERVED_RESTAURANT_IDS`](crate::orders::actions::RESERVED_RESTAURANT_IDS)).

mod handler;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new()
        // Guest
        .route("/api/order", post(handler::submit))
        .route("/api/order/{id}/{table_number}", get(handler::get_by_table))
        // Operator
        .route("/api/order/parcel", post(handler::create_parcel))
        .route("/api/order/id/{id}", get(handler::get_by_id))
        .route("/api/order/complete/{id}", put(handler::complete))
        .route("/api/order/pay/{id}", put(handler::pay))
        .route(
            "/api/order/{id}",
            patch(handler::edit).delete(handler::delete),
        )
        // Kitchen
        .route("/api/orders/{id}", get(handler::list))
        .route("/api/orders/{id}/items/status", put(handler::advance_items))
        .route("/api/orders/{id}/{line_id}", put(handler::set_item_status))
}
