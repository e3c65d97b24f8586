// ==========================================
// 表管理工具 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 解析错误 / 选项错误 / 目标表错误 / 存储错误
// ==========================================

use crate::repository::StoreError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件解析错误（ParseError 类）=====
    #[error("文件为空: 未找到表头行")]
    EmptyFile,

    #[error("文件仅含表头，没有数据行")]
    NoDataRows,

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("表头列名重复: {0}")]
    DuplicateColumn(String),

    #[error("第 {line} 行字段数 {found} 超过表头列数 {expected}")]
    RowTooLong {
        line: u64,
        expected: usize,
        found: usize,
    },

    // ===== 调用方选项错误 =====
    #[error("列映射无效: {0}")]
    InvalidMapping(String),

    #[error("文件列与表 {0} 的列无交集，没有可导入的列")]
    NoMatchingColumns(String),

    #[error("行数限制无效: 请求 {requested} 行，可用 {available} 行（须满足 1 <= n <= 可用行数）")]
    InvalidLimit { requested: usize, available: usize },

    // ===== 目标表错误 =====
    #[error("无法获取表 {0} 的列（表中无记录且未声明列）")]
    SchemaUnavailable(String),

    // ===== 存储错误 =====
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ImportError {
    /// 是否属于文件解析类错误
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ImportError::EmptyFile
                | ImportError::NoDataRows
                | ImportError::UnsupportedFormat(_)
                | ImportError::FileReadError(_)
                | ImportError::ExcelParseError(_)
                | ImportError::CsvParseError(_)
                | ImportError::DuplicateColumn(_)
                | ImportError::RowTooLong { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
