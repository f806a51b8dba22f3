//! Table tab domain types
//!
//! - Snapshots: sessions, orders and line items as stored and served
//! - Commands: operator edit actions
//! - Events: change notifications published after each commit

pub mod command;
pub mod event;
pub mod snapshot;
pub mod types;

// Re-exports
pub use command::{EditAction, EditActionKind, EditItemInput, EditOrderRequest, EditRequestError, LineSelector};
pub use event::{OrderEvent, OrderEventKind};
pub use snapshot::{LineItem, Order, Session};
pub use types::*;
