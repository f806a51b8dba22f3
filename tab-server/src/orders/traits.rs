//! Action plumbing shared by every order/session operation
//!
//! An action runs against an [`ActionContext`] wrapping one redb write
//! transaction. It loads what it needs, validates, writes through the
//! context and queues change events. The manager commits the transaction and
//! only then publishes the queued events.

use super::storage::{OrderStorage, StorageError};
use redb::WriteTransaction;
use shared::order::{Order, OrderEvent, Session};
use thiserror::Error;

/// Errors raised by actions
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl OrderError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

/// Execution context of one action
pub struct ActionContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a OrderStorage,
    now: i64,
    events: Vec<OrderEvent>,
}

impl<'a> ActionContext<'a> {
    pub fn new(txn: &'a WriteTransaction, storage: &'a OrderStorage, now: i64) -> Self {
        Self {
            txn,
            storage,
            now,
            events: Vec::new(),
        }
    }

    /// Timestamp stamped on everything this action writes
    pub fn now(&self) -> i64 {
        self.now
    }

    /// Queue a change event, published after commit
    pub fn emit(&mut self, event: OrderEvent) {
        self.events.push(event);
    }

    pub fn into_events(self) -> Vec<OrderEvent> {
        self.events
    }

    // ========== Sessions ==========

    pub fn load_session(&self, session_id: &str) -> OrderResult<Session> {
        self.storage
            .get_session_txn(self.txn, session_id)?
            .ok_or_else(|| OrderError::SessionNotFound(session_id.to_string()))
    }

    pub fn save_session(&self, session: &Session) -> OrderResult<()> {
        Ok(self.storage.store_session(self.txn, session)?)
    }

    pub fn active_session(
        &self,
        restaurant_id: &str,
        table_number: u32,
    ) -> OrderResult<Option<Session>> {
        let Some(session_id) =
            self.storage
                .find_active_session_txn(self.txn, restaurant_id, table_number)?
        else {
            return Ok(None);
        };
        Ok(self
            .storage
            .get_session_txn(self.txn, &session_id)?
            .filter(Session::is_active))
    }

    pub fn occupy_table(&self, session: &Session) -> OrderResult<()> {
        Ok(self.storage.set_active_session(
            self.txn,
            &session.restaurant_id,
            session.table_number,
            &session.id,
        )?)
    }

    /// Drop the table and order index rows of a session
    pub fn release_table(&self, session: &Session) -> OrderResult<()> {
        self.storage.release_active_session(
            self.txn,
            &session.restaurant_id,
            session.table_number,
            &session.id,
        )?;
        self.storage.clear_session_order(self.txn, &session.id)?;
        Ok(())
    }

    pub fn remove_session(&self, session_id: &str) -> OrderResult<bool> {
        Ok(self.storage.remove_session(self.txn, session_id)?)
    }

    // ========== Orders ==========

    pub fn load_order(&self, order_id: &str) -> OrderResult<Order> {
        self.storage
            .get_order_txn(self.txn, order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    pub fn save_order(&self, order: &Order) -> OrderResult<()> {
        Ok(self.storage.store_order(self.txn, order)?)
    }

    pub fn remove_order(&self, order_id: &str) -> OrderResult<bool> {
        Ok(self.storage.remove_order(self.txn, order_id)?)
    }

    /// The Active order bound to a session, if any
    pub fn session_order(&self, session_id: &str) -> OrderResult<Option<Order>> {
        let Some(order_id) = self.storage.find_session_order_txn(self.txn, session_id)? else {
            return Ok(None);
        };
        Ok(self
            .storage
            .get_order_txn(self.txn, &order_id)?
            .filter(Order::is_active))
    }

    pub fn bind_session_order(&self, session_id: &str, order_id: &str) -> OrderResult<()> {
        Ok(self
            .storage
            .set_session_order(self.txn, session_id, order_id)?)
    }

    pub fn unbind_session_order(&self, session_id: &str) -> OrderResult<()> {
        Ok(self.storage.clear_session_order(self.txn, session_id)?)
    }
}

/// One order/session operation
///
/// Actions are synchronous: anything that needs I/O outside redb (catalog
/// lookups) is resolved by the manager before the transaction begins.
pub trait OrderAction {
    type Output;

    fn execute(&self, ctx: &mut ActionContext<'_>) -> OrderResult<Self::Output>;
}
