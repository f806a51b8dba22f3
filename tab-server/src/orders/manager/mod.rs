//! OrdersManager - session/order lifecycle and change broadcasting
//!
//! This module handles:
//! - Catalog enrichment of guest batches (before any transaction)
//! - Running one action per redb write transaction
//! - Publishing change events after commit
//! - Read-side queries used by polling clients
//!
//! # Operation Flow
//!
//! ```text
//! submit_items(req)
//!     ├─ 1. Validate batch shape (non-empty, quantities)
//!     ├─ 2. Resolve every item through the catalog (abort on any miss)
//!     ├─ 3. Begin write transaction
//!     ├─ 4. Execute SubmitItemsAction (create or merge)
//!     ├─ 5. Commit transaction
//!     ├─ 6. Broadcast event(s) with sequence numbers
//!     └─ 7. Return Created / Existing
//! ```
//!
//! redb admits a single writer, so two submits for the same session are
//! serialized: the second one merges into the first one's committed result.

mod error;
pub use error::*;

use super::actions::{
    submit_items::build_line, AdvanceItemsAction, CloseOrderAction, CreateParcelOrderAction,
    DeleteOrderAction, EditOrderAction, OpenSessionAction, PayOrderAction, RemoveSessionAction,
    SetItemStatusAction, SubmitItemsAction,
};
use super::storage::OrderStorage;
use super::traits::{ActionContext, OrderAction};
use super::{money, Upserted};
use crate::services::CatalogLookup;
use shared::order::{
    EditAction, ItemStatus, LineItem, Order, OrderEvent, OrderStatus, Session,
};
use shared::request::{ParcelOrderRequest, SubmitItemsRequest, SubmittedItem};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default event broadcast channel capacity
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 4096;

/// OrdersManager for session and order operations
pub struct OrdersManager {
    storage: OrderStorage,
    catalog: Arc<dyn CatalogLookup>,
    event_tx: broadcast::Sender<OrderEvent>,
    /// Last published event sequence
    sequence: AtomicU64,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &"<OrderStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish()
    }
}

impl OrdersManager {
    /// Create a new OrdersManager with the given database path
    pub fn new(
        db_path: impl AsRef<Path>,
        catalog: Arc<dyn CatalogLookup>,
        event_capacity: usize,
    ) -> ManagerResult<Self> {
        let storage = OrderStorage::open(db_path)?;
        Ok(Self::with_storage(storage, catalog, event_capacity))
    }

    /// Create an OrdersManager with existing storage
    pub fn with_storage(
        storage: OrderStorage,
        catalog: Arc<dyn CatalogLookup>,
        event_capacity: usize,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(event_capacity.max(1));
        Self {
            storage,
            catalog,
            event_tx,
            sequence: AtomicU64::new(0),
        }
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    /// Get storage reference
    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    /// Run one action in its own write transaction, then broadcast its events
    ///
    /// An error drops the transaction uncommitted: nothing the action wrote
    /// becomes visible.
    fn run<A: OrderAction>(&self, action: &A) -> ManagerResult<A::Output> {
        let txn = self.storage.begin_write()?;
        let mut ctx = ActionContext::new(&txn, &self.storage, shared::util::now_millis());
        let output = action.execute(&mut ctx)?;
        let events = ctx.into_events();
        txn.commit()?;

        self.publish(events);
        Ok(output)
    }

    fn publish(&self, events: Vec<OrderEvent>) {
        for mut event in events {
            event.sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::debug!(sequence = event.sequence, kind = %event.kind, restaurant_id = %event.restaurant_id, "Broadcasting event");
            // No receivers is the normal state when no display is connected
            if self.event_tx.send(event).is_err() {
                tracing::trace!("Event dropped: no active receivers");
            }
        }
    }

    /// Price a guest batch from the catalog
    ///
    /// Any unknown item rejects the whole batch; a catalog failure aborts it.
    async fn resolve_items(
        &self,
        restaurant_id: &str,
        items: &[SubmittedItem],
    ) -> ManagerResult<Vec<LineItem>> {
        if items.is_empty() {
            return Err(ManagerError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }
        for item in items {
            money::validate_quantity(item.quantity)?;
        }

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let entry = self
                .catalog
                .lookup(restaurant_id, &item.item_id)
                .await?
                .ok_or_else(|| {
                    ManagerError::Validation(format!(
                        "Unknown menu item '{}' for restaurant {}",
                        item.item_id, restaurant_id
                    ))
                })?;
            lines.push(build_line(&entry, item.quantity, item.spice_level)?);
        }
        Ok(lines)
    }

    // ========== Sessions ==========

    /// Return the table's Active session, or open one
    pub fn get_or_create_session(
        &self,
        table_number: u32,
        restaurant_id: &str,
    ) -> ManagerResult<Upserted<Session>> {
        self.run(&OpenSessionAction {
            restaurant_id: restaurant_id.to_string(),
            table_number,
        })
    }

    pub fn get_session(&self, session_id: &str) -> ManagerResult<Session> {
        self.storage
            .get_session(session_id)?
            .ok_or_else(|| ManagerError::SessionNotFound(session_id.to_string()))
    }

    // ========== Order Aggregator ==========

    /// Create the session's order from a batch, or merge the batch into it
    pub async fn submit_items(&self, req: SubmitItemsRequest) -> ManagerResult<Upserted<Order>> {
        let items = self.resolve_items(&req.restaurant_id, &req.items).await?;
        self.run(&SubmitItemsAction {
            session_id: req.session_id,
            restaurant_id: req.restaurant_id,
            table_number: req.table_number,
            customer_name: req.customer_name,
            items,
        })
    }

    /// Create a takeaway order without table or session
    pub async fn create_parcel_order(&self, req: ParcelOrderRequest) -> ManagerResult<Order> {
        let items = self.resolve_items(&req.restaurant_id, &req.items).await?;
        self.run(&CreateParcelOrderAction {
            restaurant_id: req.restaurant_id,
            customer_name: req.customer_name,
            items,
        })
    }

    // ========== Item Status Machine ==========

    /// Move one line to `status`
    pub fn set_item_status(
        &self,
        order_id: &str,
        line_id: &str,
        status: &str,
    ) -> ManagerResult<LineItem> {
        let status = parse_item_status(status)?;
        self.run(&SetItemStatusAction {
            order_id: order_id.to_string(),
            line_id: line_id.to_string(),
            status,
        })
    }

    /// Move every line that may legally move to `status`
    pub fn advance_items(&self, order_id: &str, status: &str) -> ManagerResult<(Order, usize)> {
        let status = parse_item_status(status)?;
        self.run(&AdvanceItemsAction {
            order_id: order_id.to_string(),
            status,
        })
    }

    // ========== Order Editor ==========

    pub fn edit_order(&self, order_id: &str, action: EditAction) -> ManagerResult<Order> {
        self.run(&EditOrderAction {
            order_id: order_id.to_string(),
            action,
        })
    }

    // ========== Closure / Payment ==========

    pub fn close_order(&self, order_id: &str) -> ManagerResult<Order> {
        self.run(&CloseOrderAction {
            order_id: order_id.to_string(),
        })
    }

    pub fn pay_order(&self, order_id: &str) -> ManagerResult<Order> {
        self.run(&PayOrderAction {
            order_id: order_id.to_string(),
        })
    }

    /// Delete an order, then remove its session
    ///
    /// Two transactions: if the session is missing the call reports
    /// `SessionNotFound` while the order stays deleted.
    pub fn delete_order(&self, order_id: &str) -> ManagerResult<Order> {
        let order = self.run(&DeleteOrderAction {
            order_id: order_id.to_string(),
        })?;

        if let Some(session_id) = &order.session_id {
            self.run(&RemoveSessionAction {
                session_id: session_id.clone(),
            })
            .inspect_err(|e| {
                tracing::warn!(order_id = %order.id, session_id = %session_id, error = %e, "Order deleted but session removal failed");
            })?;
        }
        Ok(order)
    }

    // ========== Queries ==========

    pub fn get_order(&self, order_id: &str) -> ManagerResult<Order> {
        self.storage
            .get_order(order_id)?
            .ok_or_else(|| ManagerError::OrderNotFound(order_id.to_string()))
    }

    /// The running order of a table's Active session
    pub fn get_table_order(&self, restaurant_id: &str, table_number: u32) -> ManagerResult<Order> {
        let not_found = || {
            ManagerError::OrderNotFound(format!(
                "no active order for table {} of restaurant {}",
                table_number, restaurant_id
            ))
        };

        let session_id = self
            .storage
            .find_active_session(restaurant_id, table_number)?
            .ok_or_else(not_found)?;
        let order_id = self
            .storage
            .find_session_order(&session_id)?
            .ok_or_else(not_found)?;
        self.storage
            .get_order(&order_id)?
            .filter(Order::is_active)
            .ok_or_else(not_found)
    }

    /// Orders of a restaurant, optionally filtered by `Active` / `Closed`
    pub fn list_orders(&self, restaurant_id: &str, status: Option<&str>) -> ManagerResult<Vec<Order>> {
        let status = status
            .map(|s| {
                s.parse::<OrderStatus>()
                    .map_err(|e| ManagerError::Validation(e.to_string()))
            })
            .transpose()?;
        Ok(self.storage.list_orders(restaurant_id, status)?)
    }
}

fn parse_item_status(status: &str) -> ManagerResult<ItemStatus> {
    status.parse().map_err(|_| {
        ManagerError::Validation(format!(
            "Invalid status '{}', expected one of Pending, In Progress, Completed",
            status
        ))
    })
}

#[cfg(test)]
mod tests;
