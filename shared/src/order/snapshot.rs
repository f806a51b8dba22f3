//! Persisted state of sessions and orders
//!
//! These are the records the server stores and returns to every device.
//! `Order::total_amount` is always derived from `items` by the server; clients
//! never supply it.

use super::types::{
    ItemKey, ItemStatus, OrderStatus, OrderType, PaymentStatus, SessionStatus, SpiceLevel,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One table's active occupancy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub table_number: u32,
    pub restaurant_id: String,
    pub status: SessionStatus,
    /// Unix milliseconds
    pub created_at: i64,
    /// Unix milliseconds
    pub updated_at: i64,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

/// One catalog item, spice level and quantity within an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Internal line id (stable across merges and edits)
    pub line_id: String,
    /// Catalog item id
    pub item_id: String,
    pub name: String,
    /// Unit price captured when the line was created
    pub price: Decimal,
    pub quantity: u32,
    pub spice_level: SpiceLevel,
    pub status: ItemStatus,
}

impl LineItem {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.item_id.clone(), self.spice_level)
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// The running tab of a session, or a standalone parcel order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// None for parcel orders
    pub table_number: Option<u32>,
    /// None for parcel orders
    pub session_id: Option<String>,
    pub restaurant_id: String,
    pub customer_name: Option<String>,
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Unix milliseconds
    pub created_at: i64,
    /// Unix milliseconds
    pub updated_at: i64,
}

impl Order {
    pub fn is_active(&self) -> bool {
        self.status == OrderStatus::Active
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    pub fn find_line(&self, line_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.line_id == line_id)
    }

    pub fn find_line_mut(&mut self, line_id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.line_id == line_id)
    }
}
