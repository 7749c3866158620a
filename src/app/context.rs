//! 应用上下文
//!
//! 统一持有跨模块共享的配置和数据库句柄，便于在测试中注入临时数据库。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Storage;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub storage: Arc<Storage>,
}

impl AppContext {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let storage = Storage::new(config.database.clone());
        Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
        }
    }
}
