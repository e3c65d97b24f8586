// ==========================================
// 表管理工具 - 表操作 API
// ==========================================
// 职责: 查看/搜索、单条增删改、CSV 导出与模板
// 约束: 每个操作一次存储往返；未匹配的更新/删除返回 NotFound
// ==========================================

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::export::{
    export_file_name, rows_to_csv, template_csv, template_file_name, ExportArtifact,
};
use crate::api::search;
use crate::domain::{CellValue, DestinationSchema, OperationResult, Record, RowSet};
use crate::i18n::{t, t_with_args};
use crate::importer::ImportError;
use crate::repository::TableStore;

/// 查看记录的默认条数
pub const DEFAULT_VIEW_LIMIT: usize = 100;

/// 查看记录的最大条数
pub const MAX_VIEW_LIMIT: usize = 1000;

/// 由数据库自动生成、新增时忽略的列（不区分大小写）
pub const AUTO_GENERATED_COLUMNS: &[&str] = &["id", "created_at", "updated_at"];

/// 校验表名（去除首尾空白，不能为空）
pub fn validate_table_name(table: &str) -> ApiResult<String> {
    let trimmed = table.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(t("table.name_required")));
    }
    Ok(trimmed.to_string())
}

/// 将请求的条数限制在 1..=MAX_VIEW_LIMIT
pub fn clamp_view_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(DEFAULT_VIEW_LIMIT)
        .clamp(1, MAX_VIEW_LIMIT)
}

fn is_blank(value: &CellValue) -> bool {
    value.is_null() || value.to_string().trim().is_empty()
}

// ==========================================
// TableApi
// ==========================================
pub struct TableApi {
    store: Arc<dyn TableStore>,
}

impl TableApi {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// 列出可管理的表
    pub async fn list_tables(&self) -> ApiResult<Vec<String>> {
        let tables = self.store.list_tables().await?;
        debug!(count = tables.len(), "表列表已获取");
        Ok(tables)
    }

    /// 查看记录（可选关键字过滤）
    ///
    /// # 参数
    /// - table: 表名
    /// - limit: 读取条数（默认 100，限制在 1..=1000）
    /// - search: 关键字（不区分大小写，在已取回的记录中过滤）
    pub async fn view(
        &self,
        table: &str,
        limit: Option<usize>,
        search: Option<&str>,
    ) -> ApiResult<RowSet> {
        let table = validate_table_name(table)?;
        let limit = clamp_view_limit(limit);
        let rows = self.store.fetch(&table, limit).await?;

        let rows = match search {
            Some(term) => {
                let found = search::filter_rows(&rows, term);
                debug!(table = %table, term = %term, fetched = rows.len(), matched = found.len(), "搜索完成");
                found
            }
            None => rows,
        };
        Ok(rows)
    }

    /// 目标表列（采样一条记录）
    pub async fn columns(&self, table: &str) -> ApiResult<DestinationSchema> {
        let table = validate_table_name(table)?;
        Ok(self.store.sample_schema(&table).await?)
    }

    /// 新增单条记录
    ///
    /// 自动生成列（id/created_at/updated_at）与空值不写入；
    /// 全部被过滤时返回 InvalidInput
    pub async fn add_record(&self, table: &str, record: Record) -> ApiResult<OperationResult> {
        let table = validate_table_name(table)?;

        let mut record = record;
        record.retain(|column, value| {
            !AUTO_GENERATED_COLUMNS
                .iter()
                .any(|auto| auto.eq_ignore_ascii_case(column))
                && !is_blank(value)
        });
        if record.is_empty() {
            return Err(ApiError::InvalidInput(t("record.no_fields")));
        }

        let columns: Vec<String> = record.columns().map(str::to_string).collect();
        let rows = record.into_row_set();
        match self.store.insert(&table, &rows).await {
            Ok(_) => {
                info!(table = %table, columns = ?columns, "记录已新增");
                Ok(OperationResult::success_with_count(
                    t("record.insert_success"),
                    1,
                ))
            }
            Err(e) => {
                warn!(table = %table, error = %e, "新增记录失败");
                Ok(OperationResult::failure(t_with_args(
                    "record.insert_failed",
                    &[("error", &e.store_message())],
                )))
            }
        }
    }

    /// 更新 id_column == id_value 的记录
    ///
    /// 补丁中去除 id 列与空值；补丁为空返回 InvalidInput；未匹配返回 NotFound
    pub async fn update_record(
        &self,
        table: &str,
        id_column: &str,
        id_value: &CellValue,
        patch: Record,
    ) -> ApiResult<OperationResult> {
        let table = validate_table_name(table)?;
        let id_column = Self::validate_id(id_column, id_value)?;

        let mut patch = patch;
        patch.retain(|column, value| column != id_column && !is_blank(value));
        if patch.is_empty() {
            return Err(ApiError::InvalidInput(t("record.no_changes")));
        }

        match self.store.update(&table, id_column, id_value, &patch).await {
            Ok(0) => Err(self.not_found(&table, id_column, id_value)),
            Ok(matched) => {
                info!(table = %table, id_column = %id_column, id = %id_value, matched, "记录已更新");
                Ok(OperationResult::success_with_count(
                    t("record.update_success"),
                    matched,
                ))
            }
            Err(e) => {
                warn!(table = %table, error = %e, "更新记录失败");
                Ok(OperationResult::failure(t_with_args(
                    "record.update_failed",
                    &[("error", &e.store_message())],
                )))
            }
        }
    }

    /// 删除 id_column == id_value 的记录（未匹配返回 NotFound）
    pub async fn delete_record(
        &self,
        table: &str,
        id_column: &str,
        id_value: &CellValue,
    ) -> ApiResult<OperationResult> {
        let table = validate_table_name(table)?;
        let id_column = Self::validate_id(id_column, id_value)?;

        match self.store.delete(&table, id_column, id_value).await {
            Ok(0) => Err(self.not_found(&table, id_column, id_value)),
            Ok(matched) => {
                info!(table = %table, id_column = %id_column, id = %id_value, matched, "记录已删除");
                Ok(OperationResult::success_with_count(
                    t("record.delete_success"),
                    matched,
                ))
            }
            Err(e) => {
                warn!(table = %table, error = %e, "删除记录失败");
                Ok(OperationResult::failure(t_with_args(
                    "record.delete_failed",
                    &[("error", &e.store_message())],
                )))
            }
        }
    }

    /// 导出记录为 CSV
    pub fn export(&self, table: &str, rows: &RowSet) -> ApiResult<ExportArtifact> {
        let table = validate_table_name(table)?;
        Ok(ExportArtifact {
            file_name: export_file_name(&table, Local::now()),
            content: rows_to_csv(rows)?,
        })
    }

    /// 生成导入模板（表头 = 目标表列）
    ///
    /// # 参数
    /// - declared_columns: 显式声明的列（空表时使用）
    pub async fn template(
        &self,
        table: &str,
        declared_columns: Option<&[String]>,
    ) -> ApiResult<ExportArtifact> {
        let table = validate_table_name(table)?;
        let schema = match declared_columns {
            Some(columns) => DestinationSchema::declared(&table, columns.to_vec()),
            None => self.store.sample_schema(&table).await?,
        };
        if schema.is_empty() {
            return Err(ImportError::SchemaUnavailable(table).into());
        }

        Ok(ExportArtifact {
            file_name: template_file_name(&table),
            content: template_csv(schema.columns())?,
        })
    }

    fn validate_id<'a>(id_column: &'a str, id_value: &CellValue) -> ApiResult<&'a str> {
        let id_column = id_column.trim();
        if id_column.is_empty() || is_blank(id_value) {
            return Err(ApiError::InvalidInput(t("record.id_required")));
        }
        Ok(id_column)
    }

    fn not_found(&self, table: &str, id_column: &str, id_value: &CellValue) -> ApiError {
        ApiError::NotFound(t_with_args(
            "record.not_found",
            &[
                ("table", table),
                ("column", id_column),
                ("id", &id_value.to_string()),
            ],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_view_limit() {
        assert_eq!(clamp_view_limit(None), 100);
        assert_eq!(clamp_view_limit(Some(0)), 1);
        assert_eq!(clamp_view_limit(Some(5000)), 1000);
        assert_eq!(clamp_view_limit(Some(25)), 25);
    }

    #[test]
    fn test_validate_table_name() {
        assert_eq!(validate_table_name("  users ").unwrap(), "users");
        assert!(matches!(
            validate_table_name("   "),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
