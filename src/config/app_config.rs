// ==========================================
// 表管理工具 - 应用配置
// ==========================================
// 来源: 进程环境变量（启动时由 dotenv 加载 .env）
// 约束: 远程后端缺少 URL/KEY 时启动失败（致命）
// ==========================================

use crate::db::default_local_db_path;
use std::time::Duration;
use thiserror::Error;

/// 配置键
pub mod env_keys {
    pub const SUPABASE_URL: &str = "SUPABASE_URL";
    pub const SUPABASE_KEY: &str = "SUPABASE_KEY";
    pub const TIMEOUT_MS: &str = "TABLE_ADMIN_TIMEOUT_MS";
    pub const LOCALE: &str = "TABLE_ADMIN_LOCALE";
}

/// 默认请求超时（毫秒）
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// 默认语言
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// 支持的语言
pub const SUPPORTED_LOCALES: &[&str] = &["zh-CN", "en"];

/// 配置错误（启动时致命）
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("缺少必需的配置项: {0}")]
    MissingSetting(&'static str),

    #[error("配置项 {key} 的值无效: {value}")]
    InvalidSetting { key: &'static str, value: String },
}

/// 配置 Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 存储后端
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgREST 远程数据库
    Remote { url: String, key: String },
    /// 本地 SQLite 文件
    Local { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: StoreBackend,
    pub timeout: Duration,
    pub locale: String,
}

impl AppConfig {
    /// 从进程环境读取配置
    ///
    /// # 参数
    /// - local_db: 指定时使用本地 SQLite 后端（不需要远程凭据）
    pub fn from_env(local_db: Option<&str>) -> ConfigResult<Self> {
        Self::from_lookup(local_db, |key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置
    pub fn from_lookup<F>(local_db: Option<&str>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let backend = match local_db {
            Some(path) => {
                let path = path.trim();
                StoreBackend::Local {
                    path: if path.is_empty() {
                        default_local_db_path()
                    } else {
                        path.to_string()
                    },
                }
            }
            None => StoreBackend::Remote {
                url: read(env_keys::SUPABASE_URL)
                    .ok_or(ConfigError::MissingSetting(env_keys::SUPABASE_URL))?,
                key: read(env_keys::SUPABASE_KEY)
                    .ok_or(ConfigError::MissingSetting(env_keys::SUPABASE_KEY))?,
            },
        };

        let timeout_ms = match read(env_keys::TIMEOUT_MS) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidSetting {
                    key: env_keys::TIMEOUT_MS,
                    value: raw,
                })?,
            None => DEFAULT_TIMEOUT_MS,
        };

        let locale = match read(env_keys::LOCALE) {
            Some(raw) if SUPPORTED_LOCALES.contains(&raw.as_str()) => raw,
            Some(raw) => {
                return Err(ConfigError::InvalidSetting {
                    key: env_keys::LOCALE,
                    value: raw,
                })
            }
            None => DEFAULT_LOCALE.to_string(),
        };

        Ok(Self {
            backend,
            timeout: Duration::from_millis(timeout_ms),
            locale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_remote_requires_credentials() {
        let err = AppConfig::from_lookup(None, lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingSetting("SUPABASE_URL"));

        let err = AppConfig::from_lookup(
            None,
            lookup(&[("SUPABASE_URL", "https://x.supabase.co"), ("SUPABASE_KEY", "  ")]),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingSetting("SUPABASE_KEY"));
    }

    #[test]
    fn test_remote_defaults() {
        let config = AppConfig::from_lookup(
            None,
            lookup(&[("SUPABASE_URL", "https://x.supabase.co"), ("SUPABASE_KEY", "k")]),
        )
        .unwrap();

        assert_eq!(
            config.backend,
            StoreBackend::Remote {
                url: "https://x.supabase.co".to_string(),
                key: "k".to_string()
            }
        );
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.locale, "zh-CN");
    }

    #[test]
    fn test_local_backend_needs_no_credentials() {
        let config = AppConfig::from_lookup(Some("/tmp/t.db"), lookup(&[])).unwrap();
        assert_eq!(
            config.backend,
            StoreBackend::Local {
                path: "/tmp/t.db".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_timeout_and_locale() {
        let err = AppConfig::from_lookup(
            Some("/tmp/t.db"),
            lookup(&[("TABLE_ADMIN_TIMEOUT_MS", "soon")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { key: "TABLE_ADMIN_TIMEOUT_MS", .. }));

        let err = AppConfig::from_lookup(Some("/tmp/t.db"), lookup(&[("TABLE_ADMIN_LOCALE", "fr")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { key: "TABLE_ADMIN_LOCALE", .. }));
    }

    #[test]
    fn test_custom_timeout_and_locale() {
        let config = AppConfig::from_lookup(
            Some("/tmp/t.db"),
            lookup(&[("TABLE_ADMIN_TIMEOUT_MS", "5000"), ("TABLE_ADMIN_LOCALE", "en")]),
        )
        .unwrap();
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config.locale, "en");
    }
}
