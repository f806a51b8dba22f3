//! Change events - published after every committed mutation
//!
//! Kitchen and operator displays may subscribe to these instead of polling.
//! An event carries the full order snapshot where one still exists, so a
//! subscriber never has to re-fetch to stay current.

use super::snapshot::{Order, Session};
use serde::{Deserialize, Serialize};

/// What happened
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventKind {
    // Sessions
    SessionOpened,

    // Orders
    OrderCreated,
    ItemsMerged,
    OrderEdited,

    // Kitchen
    ItemStatusChanged,

    // Closure
    OrderClosed,
    OrderPaid,
    OrderDeleted,
    SessionReleased,
}

impl std::fmt::Display for OrderEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderEventKind::SessionOpened => "SESSION_OPENED",
            OrderEventKind::OrderCreated => "ORDER_CREATED",
            OrderEventKind::ItemsMerged => "ITEMS_MERGED",
            OrderEventKind::OrderEdited => "ORDER_EDITED",
            OrderEventKind::ItemStatusChanged => "ITEM_STATUS_CHANGED",
            OrderEventKind::OrderClosed => "ORDER_CLOSED",
            OrderEventKind::OrderPaid => "ORDER_PAID",
            OrderEventKind::OrderDeleted => "ORDER_DELETED",
            OrderEventKind::SessionReleased => "SESSION_RELEASED",
        };
        f.write_str(name)
    }
}

/// Change event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    /// Per-process sequence, assigned when the event is published
    pub sequence: u64,
    pub restaurant_id: String,
    pub kind: OrderEventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Snapshot after the change (absent for deletions and session events)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl OrderEvent {
    /// Event about an order, carrying its post-change snapshot
    pub fn for_order(kind: OrderEventKind, order: &Order, timestamp: i64) -> Self {
        Self {
            sequence: 0,
            restaurant_id: order.restaurant_id.clone(),
            kind,
            order_id: Some(order.id.clone()),
            session_id: order.session_id.clone(),
            order: Some(order.clone()),
            timestamp,
        }
    }

    /// Event about a session only
    pub fn for_session(kind: OrderEventKind, session: &Session, timestamp: i64) -> Self {
        Self {
            sequence: 0,
            restaurant_id: session.restaurant_id.clone(),
            kind,
            order_id: None,
            session_id: Some(session.id.clone()),
            order: None,
            timestamp,
        }
    }

    /// Deletion event; the order no longer exists so no snapshot is attached
    pub fn order_deleted(order: &Order, timestamp: i64) -> Self {
        Self {
            order: None,
            ..Self::for_order(OrderEventKind::OrderDeleted, order, timestamp)
        }
    }
}
