// ==========================================
// 表管理工具 - 批量导入流水线
// ==========================================
// 流程: 解析 → 取目标表列 → 列对账 → 行清洗 → 批量提交
// 约束: 提交前的阶段均为纯函数；整条流水线最多一次 insert 调用
// ==========================================

use crate::domain::{
    ColumnMapping, DestinationSchema, MappingTarget, OperationResult, RowSet, SchemaOrigin,
};
use crate::importer::bulk_submitter::BulkSubmitter;
use crate::importer::column_reconciler::{ColumnReconciler as ColumnReconcilerImpl, ReconcileReport};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{FileFormat, UniversalFileParser};
use crate::importer::import_trait::{ColumnReconciler, RowCleaner};
use crate::importer::row_cleaner::{CleaningOptions, RowCleaner as RowCleanerImpl};
use crate::repository::TableStore;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 预览中展示的清洗后样例行数
pub const PREVIEW_SAMPLE_ROWS: usize = 10;

/// 导入选项
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// 显式列映射（None 时按同名交集）
    pub mapping: Option<Vec<(String, MappingTarget)>>,
    /// 行清洗选项
    pub cleaning: CleaningOptions,
    /// 显式声明的目标表列（用于空表）
    pub declared_columns: Option<Vec<String>>,
}

/// 导入预览（提交前展示给操作者）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportPreview {
    pub table: String,
    pub total_rows: usize,
    pub file_columns: Vec<String>,
    pub table_columns: Vec<String>,
    pub schema_origin: SchemaOrigin,
    pub reconcile: ReconcileReport,
    pub rows_after_cleaning: usize,
    pub sample: Vec<JsonValue>,
}

/// 已完成对账与清洗、尚未提交的导入
#[derive(Debug, Clone)]
pub struct PreparedImport {
    pub table: String,
    pub source: RowSet,
    pub schema: DestinationSchema,
    pub report: ReconcileReport,
    pub cleaned: RowSet,
}

impl PreparedImport {
    pub fn preview(&self, sample_size: usize) -> ImportPreview {
        ImportPreview {
            table: self.table.clone(),
            total_rows: self.source.len(),
            file_columns: self.source.columns().to_vec(),
            table_columns: self.schema.columns().to_vec(),
            schema_origin: self.schema.origin(),
            reconcile: self.report.clone(),
            rows_after_cleaning: self.cleaned.len(),
            sample: self.cleaned.head(sample_size).to_json_records(),
        }
    }
}

// ==========================================
// BulkImportPipeline
// ==========================================
pub struct BulkImportPipeline {
    store: Arc<dyn TableStore>,
    parser: UniversalFileParser,
    reconciler: Box<dyn ColumnReconciler>,
    cleaner: Box<dyn RowCleaner>,
    submitter: BulkSubmitter,
}

impl BulkImportPipeline {
    /// 使用默认阶段实现创建流水线
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self::with_components(
            store,
            Box::new(ColumnReconcilerImpl),
            Box::new(RowCleanerImpl),
        )
    }

    /// 注入自定义阶段实现
    ///
    /// # 参数
    /// - store: 表存储（提交器与采样共用）
    /// - reconciler: 列对账器
    /// - cleaner: 行清洗器
    pub fn with_components(
        store: Arc<dyn TableStore>,
        reconciler: Box<dyn ColumnReconciler>,
        cleaner: Box<dyn RowCleaner>,
    ) -> Self {
        Self {
            submitter: BulkSubmitter::new(store.clone()),
            store,
            parser: UniversalFileParser,
            reconciler,
            cleaner,
        }
    }

    /// 阶段 1: 解析文件字节
    pub fn load(&self, bytes: &[u8], format: FileFormat) -> ImportResult<RowSet> {
        self.parser.parse(bytes, format)
    }

    /// 取目标表列：优先使用声明列，否则采样一条记录
    ///
    /// # 返回
    /// - Err(SchemaUnavailable): 采样结果为空且未声明列
    pub async fn resolve_schema(
        &self,
        table: &str,
        declared_columns: Option<&[String]>,
    ) -> ImportResult<DestinationSchema> {
        if let Some(columns) = declared_columns {
            let schema = DestinationSchema::declared(table, columns.to_vec());
            if !schema.is_empty() {
                return Ok(schema);
            }
        }

        let schema = self.store.sample_schema(table).await?;
        if schema.is_empty() {
            warn!(table = %table, "目标表为空，无法推断列");
            return Err(ImportError::SchemaUnavailable(table.to_string()));
        }
        Ok(schema)
    }

    /// 阶段 1-3: 解析、对账、清洗（不提交）
    ///
    /// # 返回
    /// - Err(NoMatchingColumns): 对账后没有任何保留列
    #[instrument(skip(self, bytes, options), fields(bytes = bytes.len()))]
    pub async fn prepare(
        &self,
        table: &str,
        bytes: &[u8],
        format: FileFormat,
        options: &ImportOptions,
    ) -> ImportResult<PreparedImport> {
        let source = self.load(bytes, format)?;
        info!(table = %table, rows = source.len(), columns = ?source.columns(), "文件解析完成");

        let schema = self
            .resolve_schema(table, options.declared_columns.as_deref())
            .await?;

        let mapping = options
            .mapping
            .as_ref()
            .map(|entries| ColumnMapping::from_entries(source.columns(), entries.iter().cloned()));

        let reconciled = self
            .reconciler
            .reconcile(&source, &schema, mapping.as_ref())?;

        if reconciled.rows.columns().is_empty() {
            warn!(table = %table, file_columns = ?source.columns(), "对账后无保留列");
            return Err(ImportError::NoMatchingColumns(table.to_string()));
        }

        if !reconciled.report.unmatched_file_columns.is_empty() {
            warn!(
                table = %table,
                columns = ?reconciled.report.unmatched_file_columns,
                "部分文件列不会导入"
            );
        }

        let cleaned = self.cleaner.clean(&reconciled.rows, &options.cleaning)?;
        info!(
            table = %table,
            before = reconciled.rows.len(),
            after = cleaned.len(),
            "行清洗完成"
        );

        Ok(PreparedImport {
            table: table.to_string(),
            source,
            schema,
            report: reconciled.report,
            cleaned,
        })
    }

    /// 阶段 4: 提交已准备好的导入
    pub async fn submit(&self, prepared: &PreparedImport) -> OperationResult {
        self.submitter.submit(&prepared.table, &prepared.cleaned).await
    }

    /// 完整流水线
    pub async fn run(
        &self,
        table: &str,
        bytes: &[u8],
        format: FileFormat,
        options: &ImportOptions,
    ) -> ImportResult<OperationResult> {
        let prepared = self.prepare(table, bytes, format, options).await?;
        Ok(self.submit(&prepared).await)
    }
}
