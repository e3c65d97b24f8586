// ==========================================
// 表管理工具 - 行集合 (RowSet) 与记录 (Record)
// ==========================================
// 职责: 有序的、列结构一致的记录集合
// 不变量: 每条记录都暴露完全相同的列集合（缺失值为 Null，不省略）
// 实现: 记录按列顺序存为值向量，不变量由结构保证
// ==========================================

use crate::domain::value::CellValue;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

// ==========================================
// RowSet - 行集合
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RowSet {
    /// 创建仅含列定义的空行集合
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// 追加一行
    ///
    /// 值少于列数时以 Null 补齐，多余的值被截断
    pub fn push_row(&mut self, mut values: Vec<CellValue>) {
        values.resize(self.columns.len(), CellValue::Null);
        self.rows.push(values);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// 读取指定行、指定列的值
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// 取第 row 行为 Record
    pub fn record(&self, row: usize) -> Option<Record> {
        self.rows.get(row).map(|values| {
            Record::from_pairs(
                self.columns
                    .iter()
                    .cloned()
                    .zip(values.iter().cloned())
                    .collect(),
            )
        })
    }

    /// 按列值查找第一条匹配记录（按显示文本比较）
    pub fn find_record(&self, column: &str, value: &CellValue) -> Option<Record> {
        let idx = self.column_index(column)?;
        let needle = value.to_string();
        self.rows
            .iter()
            .position(|r| r[idx].to_string() == needle)
            .and_then(|row| self.record(row))
    }

    /// 选出若干列并按给定名称输出（投影 + 重命名）
    ///
    /// # 参数
    /// - selection: (源列下标, 输出列名) 列表，按输出顺序排列
    pub fn project(&self, selection: &[(usize, String)]) -> RowSet {
        let columns = selection.iter().map(|(_, name)| name.clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|r| {
                selection
                    .iter()
                    .map(|(idx, _)| r.get(*idx).cloned().unwrap_or(CellValue::Null))
                    .collect()
            })
            .collect();
        RowSet { columns, rows }
    }

    /// 保留满足条件的行（返回新集合，原集合不变）
    pub fn filter_rows<F>(&self, mut keep: F) -> RowSet
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        RowSet {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// 取前 n 行（返回新集合）
    pub fn head(&self, n: usize) -> RowSet {
        RowSet {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// 转换为存储的原生记录格式（JSON 对象数组）
    pub fn to_json_records(&self) -> Vec<JsonValue> {
        self.rows
            .iter()
            .map(|r| {
                let object: Map<String, JsonValue> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(r.iter().map(CellValue::to_json))
                    .collect();
                JsonValue::Object(object)
            })
            .collect()
    }

    /// 从 JSON 对象数组构造
    ///
    /// 列集合为所有对象键的并集（按首次出现顺序），缺失的键补 Null
    pub fn from_json_records(records: &[JsonValue]) -> RowSet {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            if let JsonValue::Object(object) = record {
                for key in object.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
        }

        let mut row_set = RowSet::new(columns);
        for record in records {
            let values = row_set
                .columns
                .iter()
                .map(|c| {
                    record
                        .get(c)
                        .map(CellValue::from_json)
                        .unwrap_or(CellValue::Null)
                })
                .collect();
            row_set.rows.push(values);
        }
        row_set
    }
}

// ==========================================
// Record - 单条记录
// ==========================================
// 用途: 单条新增、更新补丁（部分记录）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 (列名, 值) 列表构造；同名列后者覆盖前者
    pub fn from_pairs(pairs: Vec<(String, CellValue)>) -> Self {
        let mut record = Record::new();
        for (column, value) in pairs {
            record.insert(column, value);
        }
        record
    }

    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        let column = column.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 只保留满足条件的字段
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &CellValue) -> bool,
    {
        self.fields.retain(|(c, v)| keep(c, v));
    }

    pub fn to_json_object(&self) -> JsonValue {
        let object: Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|(c, v)| (c.clone(), v.to_json()))
            .collect();
        JsonValue::Object(object)
    }

    /// 转为单行 RowSet（用于单条新增复用批量写入接口）
    pub fn into_row_set(self) -> RowSet {
        let (columns, values): (Vec<String>, Vec<CellValue>) = self.fields.into_iter().unzip();
        let mut row_set = RowSet::new(columns);
        row_set.push_row(values);
        row_set
    }
}
