//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - 错误响应结构
//!
//! # 错误码规范
//!
//! | 错误码 | HTTP | 分类 |
//! |--------|------|------|
//! | E0002 | 400 | 验证失败 (空订单、未知菜品、非法状态流转、未知编辑动作) |
//! | E0003 | 404 | 资源不存在 (session / order / item) |
//! | E0004 | 409 | 状态冲突 (重复支付) |
//! | E9001 | 500 | 内部错误 (存储或目录查询失败，细节只写日志) |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// 错误响应结构
///
/// ```json
/// {
///   "code": "E0002",
///   "message": "Order must contain at least one item"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct AppResponse {
    /// 错误码
    pub code: String,
    /// 消息
    pub message: String,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Conflict: {0}")]
    /// 状态冲突 (409)
    Conflict(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "E0003",
            AppError::Validation(_) => "E0002",
            AppError::Conflict(_) => "E0004",
            AppError::Internal(_) => "E9001",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = match &self {
            AppError::NotFound(msg) | AppError::Validation(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::Internal(msg) => {
                // 记录内部错误但不暴露存储细节
                error!(target: "internal", error = %msg, "Internal error occurred");
                "Internal server error".to_string()
            }
        };

        let body = Json(AppResponse {
            code: code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
