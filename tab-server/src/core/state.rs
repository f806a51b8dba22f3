use std::sync::Arc;

use crate::core::Config;
use crate::orders::OrdersManager;
use crate::services::{CatalogLookup, InMemoryCatalog};

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | orders | Arc<OrdersManager> | 会话/订单生命周期 + 变更广播 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub orders: Arc<OrdersManager>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("orders", &self.orders)
            .finish()
    }
}

impl ServerState {
    pub fn new(config: Config, orders: Arc<OrdersManager>) -> Self {
        Self { config, orders }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录
    /// 2. 加载菜单目录 (CATALOG_PATH 未设置时为空目录)
    /// 3. 打开 redb 数据库
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let catalog: Arc<dyn CatalogLookup> = match &config.catalog_path {
            Some(path) => Arc::new(InMemoryCatalog::load_from_file(path)?),
            None => {
                tracing::warn!("CATALOG_PATH not set, starting with an empty catalog");
                Arc::new(InMemoryCatalog::new())
            }
        };

        let db_path = config.database_path();
        let orders = OrdersManager::new(&db_path, catalog, config.event_channel_capacity)?;
        tracing::info!(path = %db_path.display(), "📂 Order storage opened");

        Ok(Self::new(config.clone(), Arc::new(orders)))
    }
}
