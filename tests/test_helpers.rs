// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的内存表存储、临时 SQLite 库、测试文件
// ==========================================
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use table_admin::domain::{CellValue, Record, RowSet};
use table_admin::repository::{SqliteTableStore, StoreError, StoreResult, TableStore};
use tempfile::NamedTempFile;

// ==========================================
// MockTableStore - 记录调用的内存存储
// ==========================================
#[derive(Default)]
pub struct MockTableStore {
    tables: Vec<String>,
    rows: RowSet,
    fail_insert: Option<String>,
    reported_inserts: Option<usize>,
    matched: usize,
    inserts: Mutex<Vec<(String, RowSet)>>,
    updates: Mutex<Vec<(String, String, CellValue, Record)>>,
    deletes: Mutex<Vec<(String, String, CellValue)>>,
    fetches: Mutex<Vec<(String, usize)>>,
}

impl MockTableStore {
    /// 表中已有一条记录，列为 columns
    pub fn with_columns(columns: &[&str]) -> Self {
        let mut rows = RowSet::new(columns.iter().map(|c| c.to_string()).collect());
        rows.push_row(columns.iter().map(|c| CellValue::from(format!("{}-0", c))).collect());
        Self::with_rows(rows)
    }

    pub fn with_rows(rows: RowSet) -> Self {
        Self {
            tables: vec!["users".to_string()],
            rows,
            matched: 1,
            ..Default::default()
        }
    }

    /// 空表（采样不到列）
    pub fn empty() -> Self {
        Self::with_rows(RowSet::new(vec![]))
    }

    pub fn with_tables(mut self, tables: &[&str]) -> Self {
        self.tables = tables.iter().map(|t| t.to_string()).collect();
        self
    }

    /// insert 返回存储拒绝错误
    pub fn failing_insert(mut self, message: &str) -> Self {
        self.fail_insert = Some(message.to_string());
        self
    }

    /// insert 成功时报告的写入条数（与提交行数无关）
    pub fn reporting_inserted(mut self, count: usize) -> Self {
        self.reported_inserts = Some(count);
        self
    }

    /// update/delete 返回的匹配条数
    pub fn matching(mut self, matched: usize) -> Self {
        self.matched = matched;
        self
    }

    pub fn insert_calls(&self) -> Vec<(String, RowSet)> {
        self.inserts.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<(String, String, CellValue, Record)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<(String, String, CellValue)> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> Vec<(String, usize)> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl TableStore for MockTableStore {
    async fn list_tables(&self) -> StoreResult<Vec<String>> {
        Ok(self.tables.clone())
    }

    async fn fetch(&self, table: &str, limit: usize) -> StoreResult<RowSet> {
        self.fetches.lock().unwrap().push((table.to_string(), limit));
        Ok(self.rows.head(limit))
    }

    async fn insert(&self, table: &str, rows: &RowSet) -> StoreResult<usize> {
        self.inserts
            .lock()
            .unwrap()
            .push((table.to_string(), rows.clone()));
        match &self.fail_insert {
            Some(message) => Err(StoreError::Rejected {
                status: 409,
                message: message.clone(),
            }),
            None => Ok(self.reported_inserts.unwrap_or(rows.len())),
        }
    }

    async fn update(
        &self,
        table: &str,
        id_column: &str,
        id_value: &CellValue,
        patch: &Record,
    ) -> StoreResult<usize> {
        self.updates.lock().unwrap().push((
            table.to_string(),
            id_column.to_string(),
            id_value.clone(),
            patch.clone(),
        ));
        Ok(self.matched)
    }

    async fn delete(
        &self,
        table: &str,
        id_column: &str,
        id_value: &CellValue,
    ) -> StoreResult<usize> {
        self.deletes
            .lock()
            .unwrap()
            .push((table.to_string(), id_column.to_string(), id_value.clone()));
        Ok(self.matched)
    }
}

// ==========================================
// SQLite 测试库
// ==========================================

/// 创建临时 SQLite 库并建 users 表
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - SqliteTableStore: 指向该文件的存储
pub fn create_test_store() -> (NamedTempFile, SqliteTableStore) {
    let temp_file = NamedTempFile::new().unwrap();
    let store = SqliteTableStore::open(temp_file.path().to_str().unwrap()).unwrap();
    store
        .execute_batch(
            r#"
            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT UNIQUE,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .unwrap();
    (temp_file, store)
}

/// 测试文件路径
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// 生成 n 行 CSV（列: name,email,extra）
pub fn users_csv(n: usize) -> String {
    let mut content = String::from("name,email,extra\n");
    for i in 1..=n {
        content.push_str(&format!("user{i},user{i}@example.com,note{i}\n"));
    }
    content
}
