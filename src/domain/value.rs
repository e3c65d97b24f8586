// ==========================================
// 表管理工具 - 单元格标量值
// ==========================================
// 职责: 表格单元格的标量表示（字符串/数值/布尔/空）
// 约束: 只允许标量，嵌套 JSON 一律按文本处理
// ==========================================

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

// ==========================================
// CellValue - 单元格值
// ==========================================
// 序列化格式: 对应的 JSON 标量（Null → null）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// 从用户输入的文本构造（空白 → Null，其余保留为文本）
    pub fn from_input(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    /// 从存储返回的 JSON 值转换
    ///
    /// 数组/对象等非标量值保留其 JSON 文本
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => CellValue::Null,
            JsonValue::Bool(b) => CellValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => n.as_f64().map(CellValue::Float).unwrap_or(CellValue::Null),
            },
            JsonValue::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }

    /// 转换为存储的原生 JSON 表示
    pub fn to_json(&self) -> JsonValue {
        match self {
            CellValue::Null => JsonValue::Null,
            CellValue::Bool(b) => JsonValue::Bool(*b),
            CellValue::Int(i) => JsonValue::from(*i),
            // NaN / 无穷大无法用 JSON 表示，按空值处理
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            CellValue::Text(s) => JsonValue::String(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_input_blank_is_null() {
        assert_eq!(CellValue::from_input("   "), CellValue::Null);
        assert_eq!(CellValue::from_input(" abc "), CellValue::Text("abc".to_string()));
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(CellValue::from_json(&json!(null)), CellValue::Null);
        assert_eq!(CellValue::from_json(&json!(42)), CellValue::Int(42));
        assert_eq!(CellValue::from_json(&json!(2.5)), CellValue::Float(2.5));
        assert_eq!(CellValue::from_json(&json!(true)), CellValue::Bool(true));
        assert_eq!(
            CellValue::from_json(&json!({"k": 1})),
            CellValue::Text("{\"k\":1}".to_string())
        );
    }

    #[test]
    fn test_nan_serializes_as_null() {
        assert_eq!(CellValue::Float(f64::NAN).to_json(), JsonValue::Null);
    }

    #[test]
    fn test_display_null_is_empty() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Int(7).to_string(), "7");
    }
}
