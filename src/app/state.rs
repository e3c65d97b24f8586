// ==========================================
// 表管理工具 - 应用状态
// ==========================================
// 职责: 启动时构造一次表存储，并注入各 API 实例
// 说明: 存储句柄在进程内共享，无显式销毁
// ==========================================

use std::sync::Arc;

use crate::api::{ImportApi, TableApi};
use crate::config::{AppConfig, StoreBackend};
use crate::repository::{RestTableStore, SqliteTableStore, StoreResult, TableStore};

/// 应用状态
///
/// 包含所有API实例和共享的表存储
pub struct AppState {
    /// 表存储（远程或本地）
    pub store: Arc<dyn TableStore>,

    /// 表操作API
    pub table_api: Arc<TableApi>,

    /// 批量导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 按配置创建表存储并初始化 API
    ///
    /// # 参数
    /// - config: 启动配置
    pub fn new(config: &AppConfig) -> StoreResult<Self> {
        let store: Arc<dyn TableStore> = match &config.backend {
            StoreBackend::Remote { url, key } => {
                tracing::info!(url = %url, timeout_ms = config.timeout.as_millis() as u64, "使用远程表存储");
                Arc::new(RestTableStore::new(url, key, config.timeout)?)
            }
            StoreBackend::Local { path } => {
                tracing::info!(path = %path, "使用本地 SQLite 表存储");
                Arc::new(SqliteTableStore::open(path)?)
            }
        };

        Ok(Self::from_store(store))
    }

    /// 使用已有存储初始化（测试注入）
    pub fn from_store(store: Arc<dyn TableStore>) -> Self {
        Self {
            table_api: Arc::new(TableApi::new(store.clone())),
            import_api: Arc::new(ImportApi::new(store.clone())),
            store,
        }
    }
}
