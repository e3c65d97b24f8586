// ==========================================
// 表管理工具 - 命令处理
// ==========================================
// 职责: 命令行参数 → API 调用 → JSON 字符串
// 约束: 失败统一映射为 ErrorResponse JSON
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::error::ApiError;
use crate::app::cli::Command;
use crate::app::state::AppState;
use crate::domain::{CellValue, Record};
use crate::importer::{CleaningOptions, ImportOptions};

/// 错误响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 将ApiError转换为JSON字符串
pub fn map_api_error(err: ApiError) -> String {
    let error_response = ErrorResponse {
        code: err.code().to_string(),
        message: err.to_string(),
        details: err.details(),
    };

    serde_json::to_string(&error_response).unwrap_or_else(|_| err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("序列化失败: {}", e))
}

fn declared(columns: Vec<String>) -> Option<Vec<String>> {
    if columns.is_empty() {
        None
    } else {
        Some(columns)
    }
}

/// 执行一条命令
///
/// # 返回
/// - Ok(String): 结果 JSON
/// - Err(String): ErrorResponse JSON
pub async fn dispatch(state: &AppState, command: Command) -> Result<String, String> {
    match command {
        Command::Tables => {
            let tables = state.table_api.list_tables().await.map_err(map_api_error)?;
            to_json(&json!({ "count": tables.len(), "tables": tables }))
        }

        Command::View {
            table,
            limit,
            search,
            export,
        } => {
            let rows = state
                .table_api
                .view(&table, limit, search.as_deref())
                .await
                .map_err(map_api_error)?;

            let exported_to = match export {
                Some(dir) => {
                    let artifact = state.table_api.export(&table, &rows).map_err(map_api_error)?;
                    let path = artifact.write_to(dir).map_err(map_api_error)?;
                    Some(path.display().to_string())
                }
                None => None,
            };

            to_json(&json!({
                "table": table.trim(),
                "count": rows.len(),
                "columns": rows.columns(),
                "records": rows.to_json_records(),
                "exported_to": exported_to,
            }))
        }

        Command::Columns { table } => {
            let schema = state.table_api.columns(&table).await.map_err(map_api_error)?;
            to_json(&schema)
        }

        Command::Add { table, fields } => {
            let result = state
                .table_api
                .add_record(&table, Record::from_pairs(fields))
                .await
                .map_err(map_api_error)?;
            to_json(&result)
        }

        Command::Update {
            table,
            id_column,
            id,
            fields,
        } => {
            let result = state
                .table_api
                .update_record(
                    &table,
                    &id_column,
                    &CellValue::from_input(&id),
                    Record::from_pairs(fields),
                )
                .await
                .map_err(map_api_error)?;
            to_json(&result)
        }

        Command::Delete {
            table,
            id_column,
            id,
        } => {
            let result = state
                .table_api
                .delete_record(&table, &id_column, &CellValue::from_input(&id))
                .await
                .map_err(map_api_error)?;
            to_json(&result)
        }

        Command::Template {
            table,
            out,
            columns,
        } => {
            let declared = declared(columns);
            let artifact = state
                .table_api
                .template(&table, declared.as_deref())
                .await
                .map_err(map_api_error)?;
            let path = artifact.write_to(out).map_err(map_api_error)?;
            to_json(&json!({ "file": path.display().to_string() }))
        }

        Command::Upload {
            table,
            file,
            mappings,
            drop_incomplete,
            limit,
            columns,
            preview,
        } => {
            let options = ImportOptions {
                mapping: if mappings.is_empty() {
                    None
                } else {
                    Some(mappings)
                },
                cleaning: CleaningOptions {
                    drop_incomplete,
                    limit,
                },
                declared_columns: declared(columns),
            };

            if preview {
                let preview = state
                    .import_api
                    .preview_file(&table, &file, &options)
                    .await
                    .map_err(map_api_error)?;
                to_json(&preview)
            } else {
                let response = state
                    .import_api
                    .upload_file(&table, &file, &options)
                    .await
                    .map_err(map_api_error)?;
                to_json(&response)
            }
        }
    }
}
