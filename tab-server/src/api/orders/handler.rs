//! Order API Handlers
//!
//! Thin adapters: decode the request, call [`OrdersManager`], map the result.
//! Manager errors convert into [`AppError`] through `?`.
//!
//! [`OrdersManager`]: crate::orders::OrdersManager

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::order::{EditAction, EditOrderRequest, LineItem, Order};
use shared::request::{
    BulkStatusResponse, DeleteOrderResponse, ItemStatusRequest, OrderListQuery,
    ParcelOrderRequest, SubmitItemsRequest,
};

use crate::core::ServerState;
use crate::orders::Upserted;
use crate::utils::{ApiJson, AppError, AppResult};

/// Submit a guest batch (201 new order / 200 merged)
pub async fn submit(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<SubmitItemsRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let result = state.orders.submit_items(payload).await?;
    let (status, order) = match result {
        Upserted::Created(order) => (StatusCode::CREATED, order),
        Upserted::Existing(order) => (StatusCode::OK, order),
    };
    Ok((status, Json(order)))
}

/// Create a parcel (takeaway) order
pub async fn create_parcel(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ParcelOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.orders.create_parcel_order(payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Active order of a table
pub async fn get_by_table(
    State(state): State<ServerState>,
    Path((restaurant_id, table_number)): Path<(String, u32)>,
) -> AppResult<Json<Order>> {
    let order = state.orders.get_table_order(&restaurant_id, table_number)?;
    Ok(Json(order))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get_order(&id)?))
}

/// List a restaurant's orders (kitchen queue with `?status=Active`)
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state
        .orders
        .list_orders(&restaurant_id, query.status.as_deref())?;
    Ok(Json(orders))
}

/// Operator edit
pub async fn edit(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<EditOrderRequest>,
) -> AppResult<Json<Order>> {
    let action = EditAction::try_from(payload).map_err(|e| AppError::validation(e.to_string()))?;
    Ok(Json(state.orders.edit_order(&id, action)?))
}

/// Delete an order and its session
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteOrderResponse>> {
    let order = state.orders.delete_order(&id)?;
    Ok(Json(DeleteOrderResponse { deleted: order.id }))
}

/// Close without payment
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.close_order(&id)?))
}

/// Mark paid and close (409 if already paid)
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.pay_order(&id)?))
}

/// Move one line through the kitchen states
pub async fn set_item_status(
    State(state): State<ServerState>,
    Path((order_id, line_id)): Path<(String, String)>,
    ApiJson(payload): ApiJson<ItemStatusRequest>,
) -> AppResult<Json<LineItem>> {
    let line = state
        .orders
        .set_item_status(&order_id, &line_id, &payload.status)?;
    Ok(Json(line))
}

/// Move every eligible line to the requested state
pub async fn advance_items(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    ApiJson(payload): ApiJson<ItemStatusRequest>,
) -> AppResult<Json<BulkStatusResponse>> {
    let (order, updated) = state.orders.advance_items(&order_id, &payload.status)?;
    Ok(Json(BulkStatusResponse { order, updated }))
}
