// ==========================================
// 表管理工具 - 远程表存储（PostgREST / Supabase）
// ==========================================
// 职责: 通过 REST 接口实现 TableStore
// 接口: {url}/rest/v1/{table}，鉴权头 apikey + Authorization: Bearer
// 约束: 不做重试，超时由 HTTP 客户端负责
// ==========================================

use crate::domain::{CellValue, Record, RowSet};
use crate::repository::error::{StoreError, StoreResult};
use crate::repository::table_store::{is_system_table, TableStore};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, Url};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, instrument};

/// REST 接口路径前缀
const REST_PREFIX: &str = "rest/v1/";

/// 返回最少内容（批量写入不需要回显）
const PREFER_MINIMAL: &str = "return=minimal";

/// 返回受影响的记录（用于统计匹配行数）
const PREFER_REPRESENTATION: &str = "return=representation";

pub struct RestTableStore {
    client: reqwest::Client,
    rest_root: Url,
}

impl RestTableStore {
    /// 创建远程存储句柄
    ///
    /// # 参数
    /// - base_url: 项目地址（如 https://xyz.supabase.co）
    /// - api_key: 访问密钥
    /// - timeout: 单次请求超时
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> StoreResult<Self> {
        let root = format!("{}/{}", base_url.trim().trim_end_matches('/'), REST_PREFIX);
        let rest_root = Url::parse(&root)
            .map_err(|e| StoreError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;
        if rest_root.cannot_be_a_base() {
            return Err(StoreError::InvalidEndpoint(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(build_auth_headers(api_key)?)
            .build()?;

        Ok(Self { client, rest_root })
    }

    /// 表资源地址（表名按路径段编码）
    fn table_url(&self, table: &str) -> StoreResult<Url> {
        let table = table.trim();
        if table.is_empty() {
            return Err(StoreError::InvalidIdentifier("表名不能为空".to_string()));
        }

        let mut url = self.rest_root.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::InvalidEndpoint(self.rest_root.to_string()))?;
            segments.pop_if_empty().push(table);
        }
        Ok(url)
    }
}

#[async_trait]
impl TableStore for RestTableStore {
    #[instrument(skip(self))]
    async fn list_tables(&self) -> StoreResult<Vec<String>> {
        let response = self.client.get(self.rest_root.clone()).send().await?;
        let document: JsonValue = ensure_success(response).await?.json().await?;

        let tables = parse_openapi_tables(&document);
        debug!(count = tables.len(), "已获取表列表");
        Ok(tables)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, table: &str, limit: usize) -> StoreResult<RowSet> {
        let response = self
            .client
            .get(self.table_url(table)?)
            .query(&[("select", "*".to_string()), ("limit", limit.to_string())])
            .send()
            .await?;
        let records: Vec<JsonValue> = ensure_success(response).await?.json().await?;

        debug!(rows = records.len(), "读取完成");
        Ok(RowSet::from_json_records(&records))
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn insert(&self, table: &str, rows: &RowSet) -> StoreResult<usize> {
        let body = JsonValue::Array(rows.to_json_records());
        let response = self
            .client
            .post(self.table_url(table)?)
            .header("Prefer", PREFER_MINIMAL)
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;

        Ok(rows.len())
    }

    #[instrument(skip(self, patch))]
    async fn update(
        &self,
        table: &str,
        id_column: &str,
        id_value: &CellValue,
        patch: &Record,
    ) -> StoreResult<usize> {
        let response = self
            .client
            .patch(self.table_url(table)?)
            .query(&[(id_column, eq_filter(id_value))])
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&patch.to_json_object())
            .send()
            .await?;
        let matched: Vec<JsonValue> = ensure_success(response).await?.json().await?;

        Ok(matched.len())
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        table: &str,
        id_column: &str,
        id_value: &CellValue,
    ) -> StoreResult<usize> {
        let response = self
            .client
            .delete(self.table_url(table)?)
            .query(&[(id_column, eq_filter(id_value))])
            .header("Prefer", PREFER_REPRESENTATION)
            .send()
            .await?;
        let matched: Vec<JsonValue> = ensure_success(response).await?.json().await?;

        Ok(matched.len())
    }
}

// ==========================================
// 辅助函数
// ==========================================

fn build_auth_headers(api_key: &str) -> StoreResult<HeaderMap> {
    let invalid = |_| StoreError::InvalidEndpoint("访问密钥包含非法字符".to_string());

    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(api_key).map_err(invalid)?);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(invalid)?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

/// 等值过滤表达式（Null 使用 is.null）
pub(crate) fn eq_filter(value: &CellValue) -> String {
    match value {
        CellValue::Null => "is.null".to_string(),
        other => format!("eq.{}", other),
    }
}

/// 非 2xx 响应转换为 Rejected，消息取存储返回的原文
async fn ensure_success(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// 提取 PostgREST 错误体中的 message 字段；非 JSON 时返回原文
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(JsonValue::Object(object)) => object
            .get("message")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string())
            .or_else(|| Some(trimmed.to_string())),
        _ => Some(trimmed.to_string()),
    }
}

/// 从 PostgREST 根路径返回的 OpenAPI 文档中提取表名
///
/// 优先读取 definitions；缺失时退回 paths（排除根路径与 /rpc/ 函数）
pub(crate) fn parse_openapi_tables(document: &JsonValue) -> Vec<String> {
    let names: Vec<String> = match document.get("definitions").and_then(|d| d.as_object()) {
        Some(definitions) => definitions.keys().cloned().collect(),
        None => document
            .get("paths")
            .and_then(|p| p.as_object())
            .map(|paths| {
                paths
                    .keys()
                    .filter(|p| !p.starts_with("/rpc/"))
                    .map(|p| p.trim_start_matches('/').to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
    };

    names.into_iter().filter(|n| !is_system_table(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> RestTableStore {
        RestTableStore::new("https://demo.supabase.co/", "anon-key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_table_url_encodes_segment() {
        let url = store().table_url("order items").unwrap();
        assert_eq!(url.as_str(), "https://demo.supabase.co/rest/v1/order%20items");
    }

    #[test]
    fn test_table_url_rejects_blank_name() {
        assert!(matches!(
            store().table_url("  "),
            Err(StoreError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = RestTableStore::new("not a url", "k", Duration::from_secs(1));
        assert!(matches!(result, Err(StoreError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_eq_filter() {
        assert_eq!(eq_filter(&CellValue::Int(5)), "eq.5");
        assert_eq!(eq_filter(&CellValue::from("abc")), "eq.abc");
        assert_eq!(eq_filter(&CellValue::Null), "is.null");
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.nope\" does not exist"}"#;
        assert_eq!(
            extract_error_message(body).unwrap(),
            "relation \"public.nope\" does not exist"
        );
        assert_eq!(extract_error_message("gateway down").unwrap(), "gateway down");
        assert_eq!(extract_error_message("   "), None);
    }

    #[test]
    fn test_parse_openapi_tables_from_definitions() {
        let doc = json!({
            "definitions": {"users": {}, "orders": {}, "information_schema": {}},
            "paths": {"/": {}, "/users": {}}
        });
        assert_eq!(parse_openapi_tables(&doc), vec!["users", "orders"]);
    }

    #[test]
    fn test_parse_openapi_tables_from_paths() {
        let doc = json!({"paths": {"/": {}, "/users": {}, "/rpc/do_it": {}}});
        assert_eq!(parse_openapi_tables(&doc), vec!["users"]);
    }
}
