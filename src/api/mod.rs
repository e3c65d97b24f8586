// ==========================================
// 表管理工具 - API 层
// ==========================================
// 职责: 提供表操作与批量导入接口，供命令行调用
// ==========================================

pub mod error;
pub mod export;
pub mod import_api;
pub mod search;
pub mod table_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use export::ExportArtifact;
pub use import_api::{ImportApi, UploadResponse};
pub use table_api::{TableApi, DEFAULT_VIEW_LIMIT, MAX_VIEW_LIMIT};
