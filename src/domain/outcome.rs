// ==========================================
// 表管理工具 - 操作结果 (OperationResult)
// ==========================================
// 职责: 存储操作与流水线边界的统一结果
// 说明: 无"部分成功"变体；批量写入在传输调用处全有或全无
// ==========================================

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationResult {
    Success {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        count: Option<usize>,
    },
    Failure {
        message: String,
    },
}

impl OperationResult {
    pub fn success_with_count(message: impl Into<String>, count: usize) -> Self {
        OperationResult::Success {
            message: message.into(),
            count: Some(count),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        OperationResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            OperationResult::Success { message, .. } => message,
            OperationResult::Failure { message } => message,
        }
    }

    /// 成功时携带的记录数
    pub fn count(&self) -> Option<usize> {
        match self {
            OperationResult::Success { count, .. } => *count,
            OperationResult::Failure { .. } => None,
        }
    }
}
