// ==========================================
// 表管理工具 - 列映射 (ColumnMapping)
// ==========================================
// 职责: 源文件列 → 目标列 / 跳过
// 不变量: 键恰好为源 RowSet 的列（未指定的源列按"跳过"补齐）
// ==========================================

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// 单个源列的映射目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "column", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingTarget {
    Skip,
    Column(String),
}

impl FromStr for MappingTarget {
    type Err = String;

    /// "skip"（不区分大小写）→ Skip；其他非空文本 → Column
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("映射目标不能为空".to_string());
        }
        if trimmed.eq_ignore_ascii_case("skip") {
            Ok(MappingTarget::Skip)
        } else {
            Ok(MappingTarget::Column(trimmed.to_string()))
        }
    }
}

impl fmt::Display for MappingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingTarget::Skip => write!(f, "Skip"),
            MappingTarget::Column(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    entries: Vec<(String, MappingTarget)>,
}

impl ColumnMapping {
    /// 由用户给出的部分映射构造
    ///
    /// 源列按文件顺序排列，未给出的源列映射为 Skip；
    /// 不属于源列的键原样保留，由对账器拒绝
    pub fn from_entries<I>(source_columns: &[String], entries: I) -> Self
    where
        I: IntoIterator<Item = (String, MappingTarget)>,
    {
        let given: Vec<(String, MappingTarget)> = entries.into_iter().collect();
        let lookup = |column: &str| {
            given
                .iter()
                .rev()
                .find(|(source, _)| source == column)
                .map(|(_, target)| target.clone())
        };

        let mut mapped: Vec<(String, MappingTarget)> = source_columns
            .iter()
            .map(|c| (c.clone(), lookup(c).unwrap_or(MappingTarget::Skip)))
            .collect();

        for (source, target) in &given {
            if !source_columns.contains(source) && !mapped.iter().any(|(s, _)| s == source) {
                mapped.push((source.clone(), target.clone()));
            }
        }

        Self { entries: mapped }
    }

    pub fn target(&self, source: &str) -> Option<&MappingTarget> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, t)| t)
    }

    pub fn entries(&self) -> &[(String, MappingTarget)] {
        &self.entries
    }
}
