// ==========================================
// 表管理工具 - API层错误类型
// ==========================================
// 职责: 汇总导入层/存储层错误，转换为用户可见的错误消息
// 约束: 每个错误必须带显式原因；code() 提供稳定的错误代码
// ==========================================

use crate::domain::OperationResult;
use crate::importer::ImportError;
use crate::repository::StoreError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(#[from] ImportError),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("存储访问失败: {0}")]
    Store(#[from] StoreError),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("导出失败: {0}")]
    Export(String),
}

impl ApiError {
    /// 稳定的错误代码（CLI 错误输出使用）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::ImportError(e) => match e {
                ImportError::InvalidMapping(_) => "INVALID_MAPPING",
                ImportError::InvalidLimit { .. } => "INVALID_LIMIT",
                ImportError::SchemaUnavailable(_) => "SCHEMA_UNAVAILABLE",
                ImportError::NoMatchingColumns(_) => "NO_MATCHING_COLUMNS",
                ImportError::Store(_) => "TRANSPORT_FAILURE",
                _ if e.is_parse_error() => "PARSE_ERROR",
                _ => "IMPORT_ERROR",
            },
            ApiError::Store(_) => "TRANSPORT_FAILURE",
            ApiError::Export(_) => "EXPORT_ERROR",
        }
    }

    /// 附加的结构化信息（可选）
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::ImportError(ImportError::InvalidLimit {
                requested,
                available,
            }) => Some(serde_json::json!({
                "requested": requested,
                "available": available,
            })),
            ApiError::ImportError(ImportError::RowTooLong {
                line,
                expected,
                found,
            }) => Some(serde_json::json!({
                "line": line,
                "expected": expected,
                "found": found,
            })),
            ApiError::Store(StoreError::Rejected { status, .. })
            | ApiError::ImportError(ImportError::Store(StoreError::Rejected { status, .. })) => {
                Some(serde_json::json!({ "status": status }))
            }
            _ => None,
        }
    }
}

// ==========================================
// 转换为用户可见的操作结果
// ==========================================
impl From<ApiError> for OperationResult {
    fn from(err: ApiError) -> Self {
        OperationResult::failure(err.to_string())
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::Export(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Export(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::InvalidInput("x".into()).code(), "INVALID_INPUT");
        assert_eq!(
            ApiError::from(ImportError::EmptyFile).code(),
            "PARSE_ERROR"
        );
        assert_eq!(
            ApiError::from(ImportError::InvalidMapping("bogus".into())).code(),
            "INVALID_MAPPING"
        );
        assert_eq!(
            ApiError::from(ImportError::NoMatchingColumns("notes".into())).code(),
            "NO_MATCHING_COLUMNS"
        );
        assert_eq!(
            ApiError::from(ImportError::Store(StoreError::Transport("down".into()))).code(),
            "TRANSPORT_FAILURE"
        );
        assert_eq!(
            ApiError::from(StoreError::Transport("down".into())).code(),
            "TRANSPORT_FAILURE"
        );
    }

    #[test]
    fn test_invalid_limit_details() {
        let err = ApiError::from(ImportError::InvalidLimit {
            requested: 20,
            available: 10,
        });
        let details = err.details().unwrap();
        assert_eq!(details["requested"], 20);
        assert_eq!(details["available"], 10);
    }

    #[test]
    fn test_into_operation_result() {
        let result: OperationResult = ApiError::NotFound("users(id=7)".into()).into();
        assert!(!result.is_success());
        assert!(result.message().contains("users(id=7)"));
    }
}
