// ==========================================
// 表管理工具 - SQLite 连接初始化
// ==========================================
// 目标:
// - 本地表存储后端统一 PRAGMA 行为（外键、busy_timeout）
// - 提供默认本地库路径（用户数据目录）
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 本地库路径环境变量
pub const LOCAL_DB_PATH_ENV: &str = "TABLE_ADMIN_DB_PATH";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认本地库路径
///
/// 优先使用 TABLE_ADMIN_DB_PATH；否则放在用户数据目录下
pub fn default_local_db_path() -> String {
    if let Ok(path) = std::env::var(LOCAL_DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./table_admin.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("table-admin");
        // best-effort: 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("table_admin.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_applies_foreign_keys() {
        let conn = open_sqlite_connection(":memory:").unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
