//! Request and response bodies of the HTTP API
//!
//! Field names are camelCase on the wire. No request carries a price or a
//! total: prices come from the catalog and totals are recomputed server-side.

use crate::order::{Order, Session, SessionStatus, SpiceLevel};
use serde::{Deserialize, Serialize};

/// `POST /api/session`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    pub table_number: u32,
    pub restaurant_id: String,
}

/// Session as returned to a guest device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub table_number: u32,
    pub status: SessionStatus,
    /// Unix milliseconds
    pub started_at: i64,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            table_number: session.table_number,
            status: session.status,
            started_at: session.created_at,
        }
    }
}

/// One item of a guest submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedItem {
    pub item_id: String,
    pub quantity: u32,
    /// Defaults to the catalog entry's spice level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<SpiceLevel>,
}

impl SubmittedItem {
    pub fn new(item_id: impl Into<String>, quantity: u32, spice_level: SpiceLevel) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            spice_level: Some(spice_level),
        }
    }
}

/// `POST /api/order`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitItemsRequest {
    pub table_number: u32,
    pub restaurant_id: String,
    pub session_id: String,
    pub items: Vec<SubmittedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

/// `POST /api/order/parcel`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelOrderRequest {
    pub restaurant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub items: Vec<SubmittedItem>,
}

/// `PUT /api/orders/{orderId}/{lineId}` and the bulk variant
///
/// The status stays a string here so an unknown value becomes a validation
/// error rather than a decode failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStatusRequest {
    pub status: String,
}

/// Result of a bulk status change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusResponse {
    pub order: Order,
    /// Number of lines that actually changed
    pub updated: usize,
}

/// `GET /api/orders/{restaurantId}` query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    /// `Active` or `Closed`; all orders when absent
    #[serde(default)]
    pub status: Option<String>,
}

/// `DELETE /api/order/{orderId}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOrderResponse {
    pub deleted: String,
}
