// ==========================================
// 表管理工具 - 文件解析器实现
// ==========================================
// 阶段 1: 文件读取与解析（表头 = 第一行）
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 类型: 仅保留文件格式自带的类型（CSV 全部为文本）
// ==========================================

use crate::domain::{CellValue, RowSet};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_trait::FileParser;
use calamine::{Data, DataType, Reader, Xls, Xlsx};
use csv::ReaderBuilder;
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// UTF-8 BOM（Excel 另存的 CSV 常带）
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ==========================================
// 文件格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// 按扩展名判断格式（不区分大小写）
    pub fn from_file_name(file_name: &str) -> ImportResult<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "xls" => Ok(FileFormat::Xls),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RowSet> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ImportError::EmptyFile);
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        // 读取表头
        let headers = normalize_headers(reader.headers()?.iter().map(|h| h.to_string()))?;
        let width = headers.len();
        let mut row_set = RowSet::new(headers);

        // 读取所有行
        for result in reader.records() {
            let record = result?;
            if record.len() > width {
                return Err(ImportError::RowTooLong {
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    expected: width,
                    found: record.len(),
                });
            }

            let values: Vec<CellValue> = record.iter().map(CellValue::from_input).collect();

            // 跳过完全空白的行
            if values.iter().all(CellValue::is_null) {
                continue;
            }

            row_set.push_row(values);
        }

        if row_set.is_empty() {
            return Err(ImportError::NoDataRows);
        }

        debug!(rows = row_set.len(), columns = width, "CSV 解析完成");
        Ok(row_set)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    format: FileFormat,
}

impl ExcelParser {
    pub fn xlsx() -> Self {
        Self {
            format: FileFormat::Xlsx,
        }
    }

    pub fn xls() -> Self {
        Self {
            format: FileFormat::Xls,
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RowSet> {
        if bytes.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        let cursor = Cursor::new(bytes.to_vec());
        match self.format {
            FileFormat::Xls => {
                let workbook: Xls<_> = Xls::new(cursor)
                    .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;
                read_first_sheet(workbook)
            }
            _ => {
                let workbook: Xlsx<_> = Xlsx::new(cursor)
                    .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;
                read_first_sheet(workbook)
            }
        }
    }
}

/// 读取第一个工作表
fn read_first_sheet<R>(mut workbook: R) -> ImportResult<RowSet>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: std::fmt::Display,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

    // 提取表头（第一行）
    let mut rows = range.rows();
    let header_row = rows.next().ok_or(ImportError::EmptyFile)?;
    let headers = normalize_headers(header_row.iter().map(|cell| cell.to_string()))?;
    let width = headers.len();
    let mut row_set = RowSet::new(headers);

    // 读取数据行
    for data_row in rows {
        let values: Vec<CellValue> = data_row.iter().take(width).map(cell_from_excel).collect();

        // 跳过完全空白的行
        if values.iter().all(CellValue::is_null) {
            continue;
        }

        row_set.push_row(values);
    }

    if row_set.is_empty() {
        return Err(ImportError::NoDataRows);
    }

    debug!(sheet = %sheet_name, rows = row_set.len(), columns = width, "Excel 解析完成");
    Ok(row_set)
}

/// Excel 单元格 → CellValue（保留原生数值/布尔类型）
fn cell_from_excel(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::from_input(s),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => CellValue::Text(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => CellValue::Text(cell.to_string()),
        },
    }
}

/// 表头标准化
///
/// - 去除首尾空白
/// - 空列名命名为 "Unnamed: {序号}"
/// - 列名重复视为解析错误
fn normalize_headers<I>(cells: I) -> ImportResult<Vec<String>>
where
    I: Iterator<Item = String>,
{
    let mut headers: Vec<String> = Vec::new();
    for (idx, cell) in cells.enumerate() {
        let trimmed = cell.trim();
        let name = if trimmed.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            trimmed.to_string()
        };

        if headers.contains(&name) {
            return Err(ImportError::DuplicateColumn(name));
        }
        headers.push(name);
    }

    if headers.is_empty() {
        return Err(ImportError::EmptyFile);
    }
    Ok(headers)
}

// ==========================================
// 通用文件解析器（根据声明格式选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse(&self, bytes: &[u8], format: FileFormat) -> ImportResult<RowSet> {
        match format {
            FileFormat::Csv => CsvParser.parse_bytes(bytes),
            FileFormat::Xlsx => ExcelParser::xlsx().parse_bytes(bytes),
            FileFormat::Xls => ExcelParser::xls().parse_bytes(bytes),
        }
    }

    /// 读取磁盘文件（格式由扩展名决定）
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RowSet> {
        let path = file_path.as_ref();
        let format = FileFormat::from_file_name(&path.to_string_lossy())?;
        let bytes = std::fs::read(path)?;
        self.parse(&bytes, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_csv_three_columns_five_rows() {
        let content = "a,b,c\n1,2,3\n4,5,6\n7,8,9\n10,11,12\n13,14,15\n";
        let rows = CsvParser.parse_bytes(content.as_bytes()).unwrap();

        assert_eq!(rows.len(), 5);
        assert_eq!(rows.columns(), &["a", "b", "c"]);
        assert_eq!(rows.value(0, "a"), Some(&CellValue::from("1")));
        assert_eq!(rows.value(4, "c"), Some(&CellValue::from("15")));
    }

    #[test]
    fn test_csv_empty_file() {
        assert!(matches!(CsvParser.parse_bytes(b""), Err(ImportError::EmptyFile)));
        assert!(matches!(CsvParser.parse_bytes(b"  \n"), Err(ImportError::EmptyFile)));
    }

    #[test]
    fn test_csv_header_only() {
        let result = CsvParser.parse_bytes(b"name,email\n");
        assert!(matches!(result, Err(ImportError::NoDataRows)));
    }

    #[test]
    fn test_csv_blank_values_are_null_and_short_rows_padded() {
        let rows = CsvParser.parse_bytes(b"name,email,age\nalice,,30\nbob\n").unwrap();
        assert_eq!(rows.value(0, "email"), Some(&CellValue::Null));
        assert_eq!(rows.value(1, "age"), Some(&CellValue::Null));
    }

    #[test]
    fn test_csv_skip_empty_rows() {
        let rows = CsvParser.parse_bytes(b"name,email\nalice,a@x\n,\nbob,b@x\n").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_csv_row_too_long() {
        let result = CsvParser.parse_bytes(b"a,b\n1,2,3\n");
        assert!(matches!(
            result,
            Err(ImportError::RowTooLong { expected: 2, found: 3, .. })
        ));
    }

    #[test]
    fn test_csv_duplicate_header() {
        let result = CsvParser.parse_bytes(b"a,a\n1,2\n");
        assert!(matches!(result, Err(ImportError::DuplicateColumn(c)) if c == "a"));
    }

    #[test]
    fn test_csv_strips_bom_and_names_blank_headers() {
        let rows = CsvParser.parse_bytes(b"\xEF\xBB\xBFid,,name\n1,x,y\n").unwrap();
        assert_eq!(rows.columns(), &["id", "Unnamed: 1", "name"]);
    }

    #[test]
    fn test_excel_garbage_is_parse_error() {
        let result = ExcelParser::xlsx().parse_bytes(b"definitely not a zip archive");
        let err = result.unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_file_format_from_name() {
        assert_eq!(FileFormat::from_file_name("data.CSV").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_file_name("a.b.xlsx").unwrap(), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_file_name("old.xls").unwrap(), FileFormat::Xls);
        assert!(matches!(
            FileFormat::from_file_name("notes.txt"),
            Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn test_parse_file_from_disk() {
        let mut temp_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "name,email").unwrap();
        writeln!(temp_file, "alice,a@example.com").unwrap();

        let rows = UniversalFileParser.parse_file(temp_file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.value(0, "email"), Some(&CellValue::from("a@example.com")));
    }

    #[test]
    fn test_excel_cells_keep_native_types() {
        assert_eq!(cell_from_excel(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(cell_from_excel(&Data::Float(2.5)), CellValue::Float(2.5));
        assert_eq!(cell_from_excel(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            cell_from_excel(&Data::String("  alice ".to_string())),
            CellValue::from("alice")
        );
    }

    #[test]
    fn test_excel_empty_and_error_cells_are_null() {
        assert_eq!(cell_from_excel(&Data::Empty), CellValue::Null);
        assert_eq!(cell_from_excel(&Data::String("   ".to_string())), CellValue::Null);
        assert_eq!(
            cell_from_excel(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::Null
        );
    }

    #[test]
    fn test_excel_datetimes_become_iso_text() {
        // 45292.5 = 2024-01-01 12:00（1900 纪元）
        let serial = calamine::ExcelDateTime::new(
            45292.5,
            calamine::ExcelDateTimeType::DateTime,
            false,
        );
        assert_eq!(
            cell_from_excel(&Data::DateTime(serial)),
            CellValue::from("2024-01-01T12:00:00")
        );
        assert_eq!(
            cell_from_excel(&Data::DateTimeIso("2024-03-05T08:30:00".to_string())),
            CellValue::from("2024-03-05T08:30:00")
        );
        assert_eq!(
            cell_from_excel(&Data::DurationIso("PT1H".to_string())),
            CellValue::from("PT1H")
        );
    }

    #[test]
    fn test_parse_xlsx_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("users_sheet.xlsx");
        let rows = UniversalFileParser.parse_file(&path).unwrap();

        assert_eq!(rows.columns(), &["name", "email", "age", "active"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.value(0, "name"), Some(&CellValue::from("alice")));
        assert_eq!(rows.value(0, "age"), Some(&CellValue::Float(30.0)));
        assert_eq!(rows.value(0, "active"), Some(&CellValue::Bool(true)));
        assert_eq!(rows.value(1, "email"), Some(&CellValue::Null));
        assert_eq!(rows.value(1, "age"), Some(&CellValue::Float(41.5)));
        assert_eq!(rows.value(1, "active"), Some(&CellValue::Bool(false)));
    }
}
