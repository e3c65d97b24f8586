// ==========================================
// 表管理工具 - 导入层
// ==========================================
// 职责: 表格文件 → 目标表记录
// 流程: 解析 → 列对账 → 行清洗 → 批量提交
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod bulk_submitter;
pub mod column_reconciler;
pub mod error;
pub mod file_parser;
pub mod import_trait;
pub mod pipeline;
pub mod row_cleaner;

// 重导出核心类型
pub use bulk_submitter::BulkSubmitter;
pub use column_reconciler::ColumnReconciler as ColumnReconcilerImpl;
pub use column_reconciler::{ReconcileReport, Reconciled};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileFormat, UniversalFileParser};
pub use pipeline::{
    BulkImportPipeline, ImportOptions, ImportPreview, PreparedImport, PREVIEW_SAMPLE_ROWS,
};
pub use row_cleaner::RowCleaner as RowCleanerImpl;
pub use row_cleaner::CleaningOptions;

// 重导出 Trait 接口
pub use import_trait::{ColumnReconciler, FileParser, RowCleaner};
