// ==========================================
// 表管理工具 - 应用层
// ==========================================
// 职责: 命令行集成，连接操作者与 API 层
// ==========================================

pub mod cli;
pub mod commands;
pub mod state;

// 重导出
pub use cli::{Cli, Command};
pub use commands::{dispatch, map_api_error, ErrorResponse};
pub use state::AppState;
