// ==========================================
// 表管理工具 - 批量导入API
// ==========================================
// 职责: 封装导入流水线（预览 / 上传）
// 约束: 预览不写入；上传最多一次 insert 调用
// ==========================================

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::table_api::validate_table_name;
use crate::domain::OperationResult;
use crate::importer::{
    BulkImportPipeline, FileFormat, ImportError, ImportOptions, ImportPreview,
    PREVIEW_SAMPLE_ROWS,
};
use crate::repository::TableStore;

/// 上传响应
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    /// 提交前的预览（列对账、清洗后行数）
    pub preview: ImportPreview,
    /// 提交结果
    pub result: OperationResult,
}

/// 导入API
pub struct ImportApi {
    pipeline: BulkImportPipeline,
}

impl ImportApi {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            pipeline: BulkImportPipeline::new(store),
        }
    }

    /// 预览导入（不写入）
    ///
    /// # 参数
    /// - table: 目标表
    /// - file_name: 文件名（用于判断格式）
    /// - bytes: 文件内容
    /// - options: 映射 / 清洗 / 声明列
    pub async fn preview(
        &self,
        table: &str,
        file_name: &str,
        bytes: &[u8],
        options: &ImportOptions,
    ) -> ApiResult<ImportPreview> {
        let table = validate_table_name(table)?;
        let format = FileFormat::from_file_name(file_name)?;
        let prepared = self
            .pipeline
            .prepare(&table, bytes, format, options)
            .await?;
        Ok(prepared.preview(PREVIEW_SAMPLE_ROWS))
    }

    /// 上传并提交
    ///
    /// # 返回
    /// - Ok(UploadResponse): result 为 Success(count) 或 Failure(存储错误原文)
    /// - Err(ApiError): 解析 / 映射 / 无匹配列 / 行数限制 / 取列失败（不会调用 insert）
    pub async fn upload(
        &self,
        table: &str,
        file_name: &str,
        bytes: &[u8],
        options: &ImportOptions,
    ) -> ApiResult<UploadResponse> {
        let table = validate_table_name(table)?;
        let format = FileFormat::from_file_name(file_name)?;
        let prepared = self
            .pipeline
            .prepare(&table, bytes, format, options)
            .await?;

        if prepared.cleaned.is_empty() {
            return Err(ApiError::ImportError(ImportError::NoDataRows));
        }

        let preview = prepared.preview(PREVIEW_SAMPLE_ROWS);
        let result = self.pipeline.submit(&prepared).await;
        info!(
            table = %table,
            file = %file_name,
            success = result.is_success(),
            count = ?result.count(),
            "上传完成"
        );

        Ok(UploadResponse { preview, result })
    }

    /// 从磁盘文件上传
    pub async fn upload_file<P: AsRef<Path>>(
        &self,
        table: &str,
        file_path: P,
        options: &ImportOptions,
    ) -> ApiResult<UploadResponse> {
        let (file_name, bytes) = read_upload(file_path.as_ref())?;
        self.upload(table, &file_name, &bytes, options).await
    }

    /// 从磁盘文件预览
    pub async fn preview_file<P: AsRef<Path>>(
        &self,
        table: &str,
        file_path: P,
        options: &ImportOptions,
    ) -> ApiResult<ImportPreview> {
        let (file_name, bytes) = read_upload(file_path.as_ref())?;
        self.preview(table, &file_name, &bytes, options).await
    }
}

fn read_upload(path: &Path) -> ApiResult<(String, Vec<u8>)> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| ApiError::InvalidInput(format!("无效的文件路径: {}", path.display())))?;
    let bytes = std::fs::read(path).map_err(ImportError::from)?;
    Ok((file_name, bytes))
}
