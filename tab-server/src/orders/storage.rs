//! redb-based storage layer for sessions and orders
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `sessions` | `session_id` | `Session` (JSON) | Table occupancies |
//! | `active_sessions` | `(restaurant_id, table_number)` | `session_id` | At most one active session per table |
//! | `orders` | `order_id` | `Order` (JSON) | Running tabs and parcel orders |
//! | `session_orders` | `session_id` | `order_id` | The active order of a session |
//!
//! Every helper taking a `&WriteTransaction` participates in the caller's
//! transaction; nothing is visible to readers until the caller commits.
//! Dropping an uncommitted transaction discards all of its writes.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::order::{Order, OrderStatus, Session};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Sessions: key = session_id, value = JSON-serialized Session
const SESSIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Active session index: key = (restaurant_id, table_number), value = session_id
const ACTIVE_SESSIONS_TABLE: TableDefinition<(&str, u32), &str> =
    TableDefinition::new("active_sessions");

/// Orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Active order per session: key = session_id, value = order_id
const SESSION_ORDERS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("session_orders");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for OrderStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStorage").finish_non_exhaustive()
    }
}

impl OrderStorage {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate` by default: once `commit()`
    /// returns the write survives power loss.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, demos)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            // Create all tables if they don't exist
            let _ = write_txn.open_table(SESSIONS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_SESSIONS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(SESSION_ORDERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    ///
    /// redb admits one writer at a time; a second caller waits here until the
    /// first commits or aborts.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Session Operations ==========

    /// Store a session
    pub fn store_session(&self, txn: &WriteTransaction, session: &Session) -> StorageResult<()> {
        let mut table = txn.open_table(SESSIONS_TABLE)?;
        let value = serde_json::to_vec(session)?;
        table.insert(session.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get a session by ID
    pub fn get_session(&self, session_id: &str) -> StorageResult<Option<Session>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSIONS_TABLE)?;

        match table.get(session_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a session by ID (within transaction)
    pub fn get_session_txn(
        &self,
        txn: &WriteTransaction,
        session_id: &str,
    ) -> StorageResult<Option<Session>> {
        let table = txn.open_table(SESSIONS_TABLE)?;

        match table.get(session_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Remove a session, returning whether it existed
    pub fn remove_session(&self, txn: &WriteTransaction, session_id: &str) -> StorageResult<bool> {
        let mut table = txn.open_table(SESSIONS_TABLE)?;
        Ok(table.remove(session_id)?.is_some())
    }

    // ========== Active Session Index ==========

    /// Find the active session of a table (within transaction)
    pub fn find_active_session_txn(
        &self,
        txn: &WriteTransaction,
        restaurant_id: &str,
        table_number: u32,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(ACTIVE_SESSIONS_TABLE)?;
        Ok(table
            .get((restaurant_id, table_number))?
            .map(|guard| guard.value().to_string()))
    }

    /// Find the active session of a table (read-only, outside transaction)
    pub fn find_active_session(
        &self,
        restaurant_id: &str,
        table_number: u32,
    ) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACTIVE_SESSIONS_TABLE)?;
        Ok(table
            .get((restaurant_id, table_number))?
            .map(|guard| guard.value().to_string()))
    }

    /// Mark a session as the table's active session
    pub fn set_active_session(
        &self,
        txn: &WriteTransaction,
        restaurant_id: &str,
        table_number: u32,
        session_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_SESSIONS_TABLE)?;
        table.insert((restaurant_id, table_number), session_id)?;
        Ok(())
    }

    /// Release the table if (and only if) it is held by `session_id`
    pub fn release_active_session(
        &self,
        txn: &WriteTransaction,
        restaurant_id: &str,
        table_number: u32,
        session_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_SESSIONS_TABLE)?;
        let holder = table
            .get((restaurant_id, table_number))?
            .map(|guard| guard.value().to_string());
        if holder.as_deref() == Some(session_id) {
            table.remove((restaurant_id, table_number))?;
        }
        Ok(())
    }

    // ========== Order Operations ==========

    /// Store an order
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get an order by ID
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by ID (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Remove an order, returning whether it existed
    pub fn remove_order(&self, txn: &WriteTransaction, order_id: &str) -> StorageResult<bool> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        Ok(table.remove(order_id)?.is_some())
    }

    /// List orders of a restaurant, oldest first
    pub fn list_orders(
        &self,
        restaurant_id: &str,
        status: Option<OrderStatus>,
    ) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.restaurant_id == restaurant_id && status.is_none_or(|s| order.status == s) {
                orders.push(order);
            }
        }

        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    // ========== Session → Order Index ==========

    /// Find the active order of a session (within transaction)
    pub fn find_session_order_txn(
        &self,
        txn: &WriteTransaction,
        session_id: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(SESSION_ORDERS_TABLE)?;
        Ok(table.get(session_id)?.map(|guard| guard.value().to_string()))
    }

    /// Find the active order of a session (read-only, outside transaction)
    pub fn find_session_order(&self, session_id: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSION_ORDERS_TABLE)?;
        Ok(table.get(session_id)?.map(|guard| guard.value().to_string()))
    }

    /// Bind an order as the session's active order
    pub fn set_session_order(
        &self,
        txn: &WriteTransaction,
        session_id: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(SESSION_ORDERS_TABLE)?;
        table.insert(session_id, order_id)?;
        Ok(())
    }

    /// Unbind the session's active order
    pub fn clear_session_order(&self, txn: &WriteTransaction, session_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(SESSION_ORDERS_TABLE)?;
        table.remove(session_id)?;
        Ok(())
    }
}
