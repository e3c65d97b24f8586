// ==========================================
// 表管理工具 - 结果集搜索
// ==========================================
// 对已取回的 RowSet 做子串过滤（不下推到存储）
// 规则: 任一列的显示文本包含关键字即保留；不区分大小写；空值不匹配
// ==========================================

use crate::domain::RowSet;

/// 按关键字过滤记录
///
/// # 参数
/// - rows: 已取回的记录
/// - term: 关键字（去除首尾空白后为空时不过滤）
pub fn filter_rows(rows: &RowSet, term: &str) -> RowSet {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return rows.clone();
    }

    rows.filter_rows(|values| {
        values
            .iter()
            .filter(|v| !v.is_null())
            .any(|v| v.to_string().to_lowercase().contains(&needle))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CellValue;

    fn users() -> RowSet {
        let mut rows = RowSet::new(vec!["name".to_string(), "age".to_string()]);
        rows.push_row(vec![CellValue::from("Alice"), CellValue::Int(30)]);
        rows.push_row(vec![CellValue::from("bob"), CellValue::Int(41)]);
        rows.push_row(vec![CellValue::Null, CellValue::Int(5)]);
        rows
    }

    #[test]
    fn test_case_insensitive_match() {
        let found = filter_rows(&users(), "ALI");
        assert_eq!(found.len(), 1);
        assert_eq!(found.value(0, "name"), Some(&CellValue::from("Alice")));
    }

    #[test]
    fn test_matches_numbers_as_text() {
        assert_eq!(filter_rows(&users(), "41").len(), 1);
    }

    #[test]
    fn test_blank_term_keeps_all() {
        assert_eq!(filter_rows(&users(), "  ").len(), 3);
    }

    #[test]
    fn test_no_match_keeps_columns() {
        let found = filter_rows(&users(), "zzz");
        assert!(found.is_empty());
        assert_eq!(found.columns(), &["name", "age"]);
    }
}
