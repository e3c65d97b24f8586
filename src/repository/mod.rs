// ==========================================
// 表管理工具 - 数据仓储层（表存储门面）
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供表级 CRUD 接口，屏蔽远程/本地存储细节
// 约束: 所有值参数化传递，标识符统一转义/编码
// ==========================================

pub mod error;
pub mod rest_store;
pub mod sqlite_store;
pub mod table_store;

// 重导出核心类型
pub use error::{StoreError, StoreResult};
pub use rest_store::RestTableStore;
pub use sqlite_store::SqliteTableStore;
pub use table_store::{is_system_table, TableStore, SYSTEM_SCHEMAS};
