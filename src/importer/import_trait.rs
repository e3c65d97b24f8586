// ==========================================
// 表管理工具 - 导入流水线 Trait
// ==========================================
// 职责: 定义导入各阶段接口（不包含实现）
// 流程: 解析 → 列对账 → 行清洗 → 批量提交
// ==========================================

use crate::domain::{ColumnMapping, DestinationSchema, RowSet};
use crate::importer::column_reconciler::Reconciled;
use crate::importer::error::ImportResult;
use crate::importer::row_cleaner::CleaningOptions;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 1）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件内容为 RowSet
    ///
    /// # 参数
    /// - bytes: 文件原始字节
    ///
    /// # 返回
    /// - Ok(RowSet): 列名取自表头行，列顺序保持文件顺序
    /// - Err: 空文件、格式错误
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RowSet>;
}

// ==========================================
// ColumnReconciler Trait
// ==========================================
// 用途: 列对账接口（阶段 2）
// 实现者: ColumnReconcilerImpl
pub trait ColumnReconciler: Send + Sync {
    /// 将文件列投影到目标表列
    ///
    /// # 参数
    /// - rows: 源 RowSet（不会被修改）
    /// - schema: 目标表已知列
    /// - mapping: 显式映射（None 时按同名交集）
    ///
    /// # 返回
    /// - Ok(Reconciled): 投影后的 RowSet + 对账报告（未匹配列）
    /// - Err: 映射无效
    fn reconcile(
        &self,
        rows: &RowSet,
        schema: &DestinationSchema,
        mapping: Option<&ColumnMapping>,
    ) -> ImportResult<Reconciled>;
}

// ==========================================
// RowCleaner Trait
// ==========================================
// 用途: 行清洗接口（阶段 3）
// 实现者: RowCleanerImpl
pub trait RowCleaner: Send + Sync {
    /// 删除含空值的记录
    fn drop_incomplete(&self, rows: &RowSet) -> RowSet;

    /// 保留前 n 条记录（1 <= n <= 记录数）
    fn limit(&self, rows: &RowSet, n: usize) -> ImportResult<RowSet>;

    /// 按选项依次执行: 先删除不完整记录，再截取前 n 条
    ///
    /// 不修改输入；相同输入与选项得到相同输出
    fn clean(&self, rows: &RowSet, options: &CleaningOptions) -> ImportResult<RowSet> {
        let cleaned = if options.drop_incomplete {
            self.drop_incomplete(rows)
        } else {
            rows.clone()
        };

        match options.limit {
            Some(n) => self.limit(&cleaned, n),
            None => Ok(cleaned),
        }
    }
}
