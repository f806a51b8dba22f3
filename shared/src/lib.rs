//! Shared types for the table tab server
//!
//! Domain records, wire requests and change events used by the server and by
//! any guest, kitchen or operator client.

pub mod order;
pub mod request;
pub mod util;

// Re-exports
pub use order::{
    ItemStatus, LineItem, Order, OrderEvent, OrderEventKind, OrderStatus, OrderType, PaymentStatus,
    Session, SessionStatus, SpiceLevel,
};
