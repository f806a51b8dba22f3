//! Order management
//!
//! - [`storage`]: redb tables for sessions, orders and their indexes
//! - [`actions`]: one action per operation, run inside a write transaction
//! - [`manager`]: [`OrdersManager`], the entry point used by the HTTP layer
//! - [`status`], [`consolidate`], [`money`]: the pure rules actions share

pub mod actions;
pub mod consolidate;
pub mod manager;
pub mod money;
pub mod status;
pub mod storage;
pub mod traits;

pub use manager::{ManagerError, ManagerResult, OrdersManager};
pub use storage::{OrderStorage, StorageError};
pub use traits::{OrderError, OrderResult};

/// Result of a get-or-create operation
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted<T> {
    /// Newly created (HTTP 201)
    Created(T),
    /// Already existed; returned as is or merged into (HTTP 200)
    Existing(T),
}

impl<T> Upserted<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Upserted::Created(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Upserted::Created(value) | Upserted::Existing(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Upserted::Created(value) | Upserted::Existing(value) => value,
        }
    }
}
