// ==========================================
// 表管理工具 - 核心库
// ==========================================
// 技术栈: Rust + PostgREST (reqwest) / SQLite (rusqlite)
// 系统定位: 托管数据库表的查看、增删改与批量导入
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 行集合与结果类型
pub mod domain;

// 数据仓储层 - 表存储门面
pub mod repository;

// 导入层 - 批量导入流水线
pub mod importer;

// 配置层 - 启动配置
pub mod config;

// 数据库基础设施（本地存储连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 命令行集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CellValue, ColumnMapping, DestinationSchema, MappingTarget, OperationResult, Record, RowSet,
    SchemaOrigin,
};

// 存储
pub use repository::{RestTableStore, SqliteTableStore, StoreError, TableStore};

// 导入
pub use importer::{BulkImportPipeline, ImportError, ImportOptions, ImportPreview};

// API
pub use api::{ApiError, ImportApi, TableApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "表管理工具";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
