// ==========================================
// 表管理工具 - 存储层错误类型
// ==========================================
// 职责: 统一远程/本地表存储的传输失败
// 工具: thiserror 派生宏
// 说明: 存储返回的原始消息原样保留，供上层逐字展示
// ==========================================

use thiserror::Error;

/// 存储层错误类型（传输失败）
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== 远程存储错误 =====
    #[error("网络请求失败: {0}")]
    Transport(String),

    #[error("存储拒绝请求 (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("存储响应无法解析: {0}")]
    InvalidResponse(String),

    #[error("无效的存储地址或凭据: {0}")]
    InvalidEndpoint(String),

    // ===== 本地存储错误 =====
    #[error("数据库错误: {0}")]
    Database(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    // ===== 参数错误 =====
    #[error("无效的标识符: {0}")]
    InvalidIdentifier(String),
}

impl StoreError {
    /// 存储给出的原始错误消息（不带本层前缀）
    pub fn store_message(&self) -> String {
        match self {
            StoreError::Transport(msg)
            | StoreError::InvalidResponse(msg)
            | StoreError::InvalidEndpoint(msg)
            | StoreError::Database(msg)
            | StoreError::LockError(msg)
            | StoreError::InvalidIdentifier(msg) => msg.clone(),
            StoreError::Rejected { message, .. } => message.clone(),
        }
    }
}

// 实现 From<reqwest::Error>
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::InvalidResponse(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => StoreError::Database(msg),
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;
