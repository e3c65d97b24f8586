// ==========================================
// 表管理工具 - 表存储 Trait (Store Façade)
// ==========================================
// 职责: 定义对远程数据库表的五个基本操作（不包含业务逻辑）
// 红线: 存储层不含业务规则，只做数据 CRUD
// 说明: 所有操作对调用方同步（调用方 await 直到往返结束）
// ==========================================

use crate::domain::{CellValue, DestinationSchema, Record, RowSet};
use crate::repository::error::StoreResult;
use async_trait::async_trait;

// ==========================================
// TableStore Trait
// ==========================================
// 实现者: RestTableStore（PostgREST）、SqliteTableStore（本地）
#[async_trait]
pub trait TableStore: Send + Sync {
    /// 列出可访问的表名（已过滤系统 schema）
    async fn list_tables(&self) -> StoreResult<Vec<String>>;

    /// 读取至多 limit 条记录
    ///
    /// # 返回
    /// - Ok(RowSet): 空表返回 0 行（成功，不是失败）
    async fn fetch(&self, table: &str, limit: usize) -> StoreResult<RowSet>;

    /// 批量写入（一次调用，全有或全无）
    ///
    /// # 返回
    /// - Ok(usize): 提交的记录数
    async fn insert(&self, table: &str, rows: &RowSet) -> StoreResult<usize>;

    /// 更新 id_column == id_value 的记录
    ///
    /// # 返回
    /// - Ok(usize): 匹配并更新的记录数（0 表示未匹配）
    async fn update(
        &self,
        table: &str,
        id_column: &str,
        id_value: &CellValue,
        patch: &Record,
    ) -> StoreResult<usize>;

    /// 删除 id_column == id_value 的记录
    ///
    /// # 返回
    /// - Ok(usize): 匹配并删除的记录数（0 表示未匹配）
    async fn delete(&self, table: &str, id_column: &str, id_value: &CellValue)
        -> StoreResult<usize>;

    /// 采样一条记录推断目标表列集合（空表返回空集合）
    async fn sample_schema(&self, table: &str) -> StoreResult<DestinationSchema> {
        let sample = self.fetch(table, 1).await?;
        Ok(DestinationSchema::sampled(table, sample.columns().to_vec()))
    }
}

/// 系统 schema 名称，不作为可管理的表展示
pub const SYSTEM_SCHEMAS: &[&str] = &["information_schema", "pg_catalog"];

/// 过滤系统表名
pub fn is_system_table(name: &str) -> bool {
    SYSTEM_SCHEMAS
        .iter()
        .any(|schema| name == *schema || name.starts_with(&format!("{}.", schema)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_system_table() {
        assert!(is_system_table("information_schema"));
        assert!(is_system_table("pg_catalog.pg_class"));
        assert!(!is_system_table("users"));
        assert!(!is_system_table("pg_catalog_backup"));
    }
}
