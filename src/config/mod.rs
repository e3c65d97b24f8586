// ==========================================
// 表管理工具 - 配置层
// ==========================================
// 职责: 启动配置（远程凭据 / 本地库路径 / 超时 / 语言）
// 来源: 环境变量 + .env
// ==========================================

pub mod app_config;

// 重导出
pub use app_config::{
    env_keys, AppConfig, ConfigError, ConfigResult, StoreBackend, DEFAULT_LOCALE,
    DEFAULT_TIMEOUT_MS, SUPPORTED_LOCALES,
};
