// ==========================================
// 表管理工具 - 本地表存储（SQLite）
// ==========================================
// 职责: 以本地 SQLite 库实现 TableStore（离线使用 / 集成测试）
// 约束: 标识符一律双引号转义；值一律参数化
// 说明: 批量写入在单个事务内完成（全有或全无）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{CellValue, Record, RowSet};
use crate::repository::error::{StoreError, StoreResult};
use crate::repository::table_store::TableStore;
use async_trait::async_trait;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, ToSql};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

pub struct SqliteTableStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTableStore {
    /// 打开（或创建）本地库
    pub fn open(db_path: &str) -> StoreResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self::from_connection(conn))
    }

    /// 内存库（测试用）
    pub fn in_memory() -> StoreResult<Self> {
        Self::open(":memory:")
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// 执行建表等管理语句
    pub fn execute_batch(&self, sql: &str) -> StoreResult<()> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))
    }
}

#[async_trait]
impl TableStore for SqliteTableStore {
    async fn list_tables(&self) -> StoreResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, table: &str, limit: usize) -> StoreResult<RowSet> {
        let conn = self.lock()?;
        let sql = format!("SELECT * FROM {} LIMIT ?1", quote_identifier(table)?);
        let mut stmt = conn.prepare(&sql)?;

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();
        let mut row_set = RowSet::new(columns);

        let mut rows = stmt.query(params![limit as i64])?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(cell_from_sql(row.get_ref(idx)?));
            }
            row_set.push_row(values);
        }

        debug!(rows = row_set.len(), "读取完成");
        Ok(row_set)
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn insert(&self, table: &str, rows: &RowSet) -> StoreResult<usize> {
        let conn = self.lock()?;
        let table = quote_identifier(table)?;

        let sql = if rows.columns().is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", table)
        } else {
            let columns = rows
                .columns()
                .iter()
                .map(|c| quote_identifier(c))
                .collect::<StoreResult<Vec<_>>>()?;
            let placeholders = (1..=columns.len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        // 事务未提交即被丢弃时自动回滚
        let tx = conn.unchecked_transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows.rows() {
                stmt.execute(params_from_iter(row.iter()))?;
                count += 1;
            }
        }
        tx.commit()?;

        Ok(count)
    }

    #[instrument(skip(self, patch))]
    async fn update(
        &self,
        table: &str,
        id_column: &str,
        id_value: &CellValue,
        patch: &Record,
    ) -> StoreResult<usize> {
        if patch.is_empty() {
            return Err(StoreError::InvalidIdentifier("更新字段为空".to_string()));
        }

        let conn = self.lock()?;
        let assignments = patch
            .columns()
            .enumerate()
            .map(|(i, c)| quote_identifier(c).map(|q| format!("{} = ?{}", q, i + 1)))
            .collect::<StoreResult<Vec<_>>>()?;
        let sql = format!(
            "UPDATE {} SET {} WHERE {} {} ?{}",
            quote_identifier(table)?,
            assignments.join(", "),
            quote_identifier(id_column)?,
            match_operator(id_value),
            patch.len() + 1
        );

        let mut values: Vec<&CellValue> = patch.fields().iter().map(|(_, v)| v).collect();
        values.push(id_value);
        let changed = conn.execute(&sql, params_from_iter(values))?;

        Ok(changed)
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        table: &str,
        id_column: &str,
        id_value: &CellValue,
    ) -> StoreResult<usize> {
        let conn = self.lock()?;
        let sql = format!(
            "DELETE FROM {} WHERE {} {} ?1",
            quote_identifier(table)?,
            quote_identifier(id_column)?,
            match_operator(id_value)
        );
        let changed = conn.execute(&sql, params![id_value])?;

        Ok(changed)
    }
}

/// 空值用 IS 匹配，其余用 =（按列类型亲和性比较）
fn match_operator(id_value: &CellValue) -> &'static str {
    if id_value.is_null() {
        "IS"
    } else {
        "="
    }
}

// ==========================================
// 类型转换
// ==========================================

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            CellValue::Null => ToSqlOutput::Owned(Value::Null),
            CellValue::Bool(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
            CellValue::Int(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            CellValue::Float(f) => ToSqlOutput::Owned(Value::Real(*f)),
            CellValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

fn cell_from_sql(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(i) => CellValue::Int(i),
        ValueRef::Real(f) => CellValue::Float(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            CellValue::Text(String::from_utf8_lossy(bytes).to_string())
        }
    }
}

/// 双引号转义标识符
pub(crate) fn quote_identifier(name: &str) -> StoreResult<String> {
    let name = name.trim();
    if name.is_empty() || name.contains('\0') {
        return Err(StoreError::InvalidIdentifier(format!("{:?}", name)));
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}
