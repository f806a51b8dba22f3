//! 工具模块 - 错误类型、请求提取器、日志初始化

pub mod error;
pub mod extract;
pub mod logger;
pub mod result;

pub use error::{AppError, AppResponse};
pub use extract::ApiJson;
pub use result::AppResult;
