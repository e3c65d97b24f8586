// ==========================================
// 表管理工具 - 命令行定义
// ==========================================
// 输出: 成功时 JSON 写入 stdout；失败时 {code, message, details} 写入 stderr
// ==========================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{CellValue, MappingTarget};

#[derive(Parser, Debug)]
#[command(name = "table-admin")]
#[command(version, about = "托管数据库表管理工具: 查看/增删改/批量导入")]
pub struct Cli {
    /// 使用本地 SQLite 文件作为表存储（不需要 SUPABASE_URL/SUPABASE_KEY）
    #[arg(long, global = true, env = "TABLE_ADMIN_LOCAL_DB")]
    pub local_db: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 列出可管理的表
    Tables,

    /// 查看记录
    View {
        table: String,

        /// 读取条数（1..=1000，默认 100）
        #[arg(long)]
        limit: Option<usize>,

        /// 在取回的记录中搜索（不区分大小写）
        #[arg(long)]
        search: Option<String>,

        /// 导出为 CSV 到指定目录
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// 列出目标表的列
    Columns { table: String },

    /// 新增一条记录: col=value ...
    Add {
        table: String,

        #[arg(value_parser = parse_assignment, required = true)]
        fields: Vec<(String, CellValue)>,
    },

    /// 更新记录: --id V col=value ...
    Update {
        table: String,

        #[arg(long, default_value = "id")]
        id_column: String,

        #[arg(long)]
        id: String,

        #[arg(value_parser = parse_assignment, required = true)]
        fields: Vec<(String, CellValue)>,
    },

    /// 删除记录
    Delete {
        table: String,

        #[arg(long, default_value = "id")]
        id_column: String,

        #[arg(long)]
        id: String,
    },

    /// 生成导入模板 CSV
    Template {
        table: String,

        /// 输出目录（默认当前目录）
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// 显式声明列（空表时使用）
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },

    /// 批量导入 .csv/.xlsx/.xls 文件
    Upload {
        table: String,

        file: PathBuf,

        /// 列映射: 源列=目标列 或 源列=skip（出现任一 --map 即启用显式映射）
        #[arg(long = "map", value_parser = parse_mapping)]
        mappings: Vec<(String, MappingTarget)>,

        /// 删除含空值的记录
        #[arg(long)]
        drop_incomplete: bool,

        /// 仅导入前 n 条
        #[arg(long)]
        limit: Option<usize>,

        /// 显式声明目标表列（空表时使用）
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// 只预览，不提交
        #[arg(long)]
        preview: bool,
    },
}

/// 解析 "列名=值"（值为空时为 Null）
pub fn parse_assignment(raw: &str) -> Result<(String, CellValue), String> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("格式应为 列名=值: {}", raw))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("列名不能为空: {}", raw));
    }
    Ok((column.to_string(), CellValue::from_input(value)))
}

/// 解析 "源列=目标列" / "源列=skip"
pub fn parse_mapping(raw: &str) -> Result<(String, MappingTarget), String> {
    let (source, target) = raw
        .split_once('=')
        .ok_or_else(|| format!("格式应为 源列=目标列: {}", raw))?;
    let source = source.trim();
    if source.is_empty() {
        return Err(format!("源列不能为空: {}", raw));
    }
    Ok((source.to_string(), target.parse::<MappingTarget>()?))
}
