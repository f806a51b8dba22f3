use super::super::storage::StorageError;
use super::super::traits::OrderError;
use crate::services::CatalogError;
use crate::utils::AppError;
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

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
}

impl From<OrderError> for ManagerError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::SessionNotFound(id) => ManagerError::SessionNotFound(id),
            OrderError::OrderNotFound(id) => ManagerError::OrderNotFound(id),
            OrderError::ItemNotFound(id) => ManagerError::ItemNotFound(id),
            OrderError::Validation(msg) => ManagerError::Validation(msg),
            OrderError::Conflict(msg) => ManagerError::Conflict(msg),
            OrderError::Storage(e) => ManagerError::Storage(e),
        }
    }
}

impl From<redb::CommitError> for ManagerError {
    fn from(err: redb::CommitError) -> Self {
        ManagerError::Storage(StorageError::from(err))
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            // 技术细节只进日志，AppError 响应时替换为通用消息
            ManagerError::Storage(e) => AppError::internal(e.to_string()),
            ManagerError::Catalog(e) => AppError::internal(e.to_string()),
            e @ (ManagerError::SessionNotFound(_)
            | ManagerError::OrderNotFound(_)
            | ManagerError::ItemNotFound(_)) => AppError::not_found(e.to_string()),
            ManagerError::Validation(msg) => AppError::validation(msg),
            ManagerError::Conflict(msg) => AppError::conflict(msg),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
