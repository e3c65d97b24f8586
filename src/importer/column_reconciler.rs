// ==========================================
// 表管理工具 - 列对账器实现
// ==========================================
// 阶段 2: 文件列 → 目标表列
// 无映射: 取文件列与表列的交集（大小写敏感），报告双方未匹配列
// 有映射: 逐列跳过/重命名；映射到表中不存在的列时立即失败
// ==========================================

use crate::domain::{ColumnMapping, DestinationSchema, MappingTarget, RowSet};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_trait::ColumnReconciler as ColumnReconcilerTrait;
use serde::Serialize;
use tracing::debug;

/// 对账报告（供调用方展示未匹配列）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// 输出的目标列（按文件列顺序）
    pub matched_columns: Vec<String>,
    /// 未进入输出的文件列
    pub unmatched_file_columns: Vec<String>,
    /// 未被任何文件列填充的表列
    pub unmatched_table_columns: Vec<String>,
    /// 是否使用了显式映射
    pub mapping_applied: bool,
}

/// 对账结果
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub rows: RowSet,
    pub report: ReconcileReport,
}

pub struct ColumnReconciler;

impl ColumnReconcilerTrait for ColumnReconciler {
    fn reconcile(
        &self,
        rows: &RowSet,
        schema: &DestinationSchema,
        mapping: Option<&ColumnMapping>,
    ) -> ImportResult<Reconciled> {
        let selection = match mapping {
            None => self.intersect(rows, schema),
            Some(mapping) => self.apply_mapping(rows, schema, mapping)?,
        };

        let projected = rows.project(&selection);
        let report = ReconcileReport {
            matched_columns: projected.columns().to_vec(),
            unmatched_file_columns: rows
                .columns()
                .iter()
                .enumerate()
                .filter(|(idx, _)| !selection.iter().any(|(sel, _)| sel == idx))
                .map(|(_, c)| c.clone())
                .collect(),
            unmatched_table_columns: schema
                .columns()
                .iter()
                .filter(|c| !projected.columns().contains(c))
                .cloned()
                .collect(),
            mapping_applied: mapping.is_some(),
        };

        debug!(
            matched = ?report.matched_columns,
            unmatched_file = ?report.unmatched_file_columns,
            unmatched_table = ?report.unmatched_table_columns,
            "列对账完成"
        );

        Ok(Reconciled {
            rows: projected,
            report,
        })
    }
}

impl ColumnReconciler {
    /// 同名交集（保持文件列顺序）
    fn intersect(&self, rows: &RowSet, schema: &DestinationSchema) -> Vec<(usize, String)> {
        rows.columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| schema.contains(c))
            .map(|(idx, c)| (idx, c.clone()))
            .collect()
    }

    /// 校验并应用显式映射
    fn apply_mapping(
        &self,
        rows: &RowSet,
        schema: &DestinationSchema,
        mapping: &ColumnMapping,
    ) -> ImportResult<Vec<(usize, String)>> {
        for (source, _) in mapping.entries() {
            if rows.column_index(source).is_none() {
                return Err(ImportError::InvalidMapping(format!(
                    "源列 {} 不在上传文件中",
                    source
                )));
            }
        }

        let mut selection: Vec<(usize, String)> = Vec::new();
        for (idx, source) in rows.columns().iter().enumerate() {
            let target = match mapping.target(source) {
                Some(MappingTarget::Column(target)) => target,
                Some(MappingTarget::Skip) | None => continue,
            };

            if !schema.contains(target) {
                return Err(ImportError::InvalidMapping(format!(
                    "目标列 {} 不属于表 {}",
                    target,
                    schema.table()
                )));
            }

            if let Some((prev_idx, _)) = selection.iter().find(|(_, t)| t == target) {
                return Err(ImportError::InvalidMapping(format!(
                    "目标列 {} 同时被 {} 和 {} 映射",
                    target,
                    rows.columns()[*prev_idx],
                    source
                )));
            }

            selection.push((idx, target.clone()));
        }

        Ok(selection)
    }
}
