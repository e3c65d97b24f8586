// ==========================================
// 表管理工具 - 目标表结构 (DestinationSchema)
// ==========================================
// 职责: 记录目标表当前已知的列名
// 来源: 采样一条现有记录（空表时为空），或由操作员显式声明
// 生命周期: 每次操作重新获取，切换表名时不复用
// ==========================================

use serde::Serialize;

/// 列集合的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaOrigin {
    /// 从一条现有记录推断（空表时不可靠）
    Sampled,
    /// 操作员显式声明
    Declared,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationSchema {
    table: String,
    columns: Vec<String>,
    origin: SchemaOrigin,
}

impl DestinationSchema {
    pub fn sampled(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            columns,
            origin: SchemaOrigin::Sampled,
        }
    }

    pub fn declared(table: impl Into<String>, columns: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(columns.len());
        for column in columns {
            let column = column.trim().to_string();
            if !column.is_empty() && !unique.contains(&column) {
                unique.push(column);
            }
        }
        Self {
            table: table.into(),
            columns: unique,
            origin: SchemaOrigin::Declared,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn origin(&self) -> SchemaOrigin {
        self.origin
    }

    /// 大小写敏感的精确匹配
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_schema_dedups_and_trims() {
        let schema = DestinationSchema::declared(
            "users",
            vec![" name".to_string(), "email".to_string(), "name".to_string(), "".to_string()],
        );
        assert_eq!(schema.columns(), &["name", "email"]);
        assert_eq!(schema.origin(), SchemaOrigin::Declared);
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let schema = DestinationSchema::sampled("users", vec!["Name".to_string()]);
        assert!(schema.contains("Name"));
        assert!(!schema.contains("name"));
    }
}
