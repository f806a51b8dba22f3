//! Tab Server - 餐厅桌台会话与订单生命周期服务
//!
//! # 架构概述
//!
//! - **订单** (`orders`): 会话、订单、厨房状态、修改与结账，redb 持久化
//! - **目录** (`services`): 外部菜单目录查询 (价格与默认辣度)
//! - **HTTP API** (`api`): 顾客、厨房、操作员三类接口及 SSE 变更流
//!
//! # 模块结构
//!
//! ```text
//! tab-server/src/
//! ├── core/          # 配置、状态、启动
//! ├── orders/        # 存储、动作、管理器
//! ├── services/      # 菜单目录
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod core;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use orders::{OrderStorage, OrdersManager};
pub use services::{CatalogLookup, InMemoryCatalog};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 设置运行环境: 加载 .env、创建工作目录、初始化日志
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    // 生产环境强制 JSON 日志
    let json = config.log_json || config.is_production();
    init_logger_with_file(Some(&config.log_level), json, Some(&log_dir));
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ______      __
 /_  __/___ _/ /_
  / / / __ `/ __ \
 / / / /_/ / /_/ /
/_/  \__,_/_.___/
    "#
    );
}
