// ==========================================
// 表管理工具 - 行清洗器实现
// ==========================================
// 阶段 3: 删除含空值的记录 / 截取前 n 条
// 顺序: 先 drop_incomplete，再 limit
// 约束: 只在对账投影之后的列上判断空值；不修改输入
// ==========================================

use crate::domain::{CellValue, RowSet};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_trait::RowCleaner as RowCleanerTrait;
use serde::{Deserialize, Serialize};

/// 清洗选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningOptions {
    /// 删除含任意空值的记录
    pub drop_incomplete: bool,
    /// 仅保留前 n 条（None 表示全部）
    pub limit: Option<usize>,
}

pub struct RowCleaner;

impl RowCleanerTrait for RowCleaner {
    fn drop_incomplete(&self, rows: &RowSet) -> RowSet {
        rows.filter_rows(|values| !values.iter().any(CellValue::is_null))
    }

    fn limit(&self, rows: &RowSet, n: usize) -> ImportResult<RowSet> {
        if n == 0 || n > rows.len() {
            return Err(ImportError::InvalidLimit {
                requested: n,
                available: rows.len(),
            });
        }
        Ok(rows.head(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_with_gap() -> RowSet {
        let mut rows = RowSet::new(vec!["name".to_string(), "email".to_string()]);
        rows.push_row(vec![CellValue::from("r1"), CellValue::from("e1")]);
        rows.push_row(vec![CellValue::from("r2"), CellValue::Null]);
        rows.push_row(vec![CellValue::from("r3"), CellValue::from("e3")]);
        rows.push_row(vec![CellValue::from("r4"), CellValue::from("e4")]);
        rows
    }

    #[test]
    fn test_drop_incomplete_keeps_order() {
        let cleaned = RowCleaner.drop_incomplete(&rows_with_gap());
        assert_eq!(cleaned.len(), 3);
        let names: Vec<String> = cleaned.rows().iter().map(|r| r[0].to_string()).collect();
        assert_eq!(names, vec!["r1", "r3", "r4"]);
    }

    #[test]
    fn test_limit_bounds() {
        let rows = rows_with_gap();
        assert!(matches!(
            RowCleaner.limit(&rows, 0),
            Err(ImportError::InvalidLimit { requested: 0, available: 4 })
        ));
        assert!(matches!(
            RowCleaner.limit(&rows, 5),
            Err(ImportError::InvalidLimit { requested: 5, available: 4 })
        ));
        assert_eq!(RowCleaner.limit(&rows, 4).unwrap().len(), 4);
        assert_eq!(RowCleaner.limit(&rows, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_limit_applies_after_drop() {
        let options = CleaningOptions {
            drop_incomplete: true,
            limit: Some(4),
        };
        // 删除后只剩 3 条，limit=4 越界
        assert!(matches!(
            RowCleaner.clean(&rows_with_gap(), &options),
            Err(ImportError::InvalidLimit { requested: 4, available: 3 })
        ));
    }

    #[test]
    fn test_clean_is_idempotent_and_non_destructive() {
        let source = rows_with_gap();
        let snapshot = source.clone();
        let options = CleaningOptions {
            drop_incomplete: true,
            limit: Some(2),
        };

        let first = RowCleaner.clean(&source, &options).unwrap();
        let second = RowCleaner.clean(&source, &options).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(source, snapshot);
    }

    #[test]
    fn test_default_options_keep_everything() {
        let source = rows_with_gap();
        let cleaned = RowCleaner.clean(&source, &CleaningOptions::default()).unwrap();
        assert_eq!(cleaned, source);
    }
}
