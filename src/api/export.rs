// ==========================================
// 表管理工具 - CSV 导出
// ==========================================
// 产物: {table}_{YYYYmmdd_HHMMSS}.csv（记录导出）
//       {table}_template.csv（仅表头的导入模板）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::RowSet;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// 待写出的导出文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content: String,
}

impl ExportArtifact {
    /// 写入目录，返回完整路径
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> ApiResult<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.content.as_bytes())?;
        info!(path = %path.display(), bytes = self.content.len(), "导出文件已写入");
        Ok(path)
    }
}

/// RowSet → CSV 文本（空值输出为空字段）
pub fn rows_to_csv(rows: &RowSet) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(rows.columns())?;
    for row in rows.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    finish(writer)
}

/// 仅含表头的 CSV 模板
pub fn template_csv(columns: &[String]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> ApiResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ApiError::Export(e.to_string()))
}

/// 记录导出文件名
pub fn export_file_name(table: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.csv", table, now.format("%Y%m%d_%H%M%S"))
}

/// 模板文件名
pub fn template_file_name(table: &str) -> String {
    format!("{}_template.csv", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CellValue;
    use chrono::TimeZone;

    #[test]
    fn test_rows_to_csv() {
        let mut rows = RowSet::new(vec!["name".to_string(), "note".to_string()]);
        rows.push_row(vec![CellValue::from("alice"), CellValue::from("a, b")]);
        rows.push_row(vec![CellValue::from("bob"), CellValue::Null]);

        let csv = rows_to_csv(&rows).unwrap();
        assert_eq!(csv, "name,note\nalice,\"a, b\"\nbob,\n");
    }

    #[test]
    fn test_template_is_header_only() {
        let csv = template_csv(&["id".to_string(), "email".to_string()]).unwrap();
        assert_eq!(csv, "id,email\n");
    }

    #[test]
    fn test_file_names() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 9, 8, 7).unwrap();
        assert_eq!(export_file_name("users", now), "users_20240305_090807.csv");
        assert_eq!(template_file_name("users"), "users_template.csv");
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ExportArtifact {
            file_name: "t_template.csv".to_string(),
            content: "a,b\n".to_string(),
        };
        let path = artifact.write_to(dir.path().join("out")).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a,b\n");
    }
}
