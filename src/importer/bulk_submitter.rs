// ==========================================
// 表管理工具 - 批量提交器
// ==========================================
// 阶段 4: 一次 insert 调用提交全部记录
// 约束: 失败不抛出，统一转换为 OperationResult::Failure
// ==========================================

use crate::domain::{OperationResult, RowSet};
use crate::i18n::t_with_args;
use crate::repository::TableStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};
use uuid::Uuid;

pub struct BulkSubmitter {
    store: Arc<dyn TableStore>,
}

impl BulkSubmitter {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// 提交清洗后的记录
    ///
    /// # 参数
    /// - table: 目标表名
    /// - rows: 已对账、已清洗的记录
    ///
    /// # 返回
    /// - Success: count = 提交的记录数
    /// - Failure: 消息包含存储层原始错误文本
    #[instrument(skip(self, rows), fields(batch_id))]
    pub async fn submit(&self, table: &str, rows: &RowSet) -> OperationResult {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        info!(
            batch_id = %batch_id,
            table = %table,
            rows = rows.len(),
            columns = ?rows.columns(),
            "开始批量提交"
        );

        match self.store.insert(table, rows).await {
            Ok(_) => {
                let count = rows.len();
                info!(
                    batch_id = %batch_id,
                    count,
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "批量提交成功"
                );
                OperationResult::success_with_count(
                    t_with_args("import.bulk_success", &[("count", &count.to_string())]),
                    count,
                )
            }
            Err(e) => {
                error!(batch_id = %batch_id, error = %e, "批量提交失败");
                OperationResult::failure(t_with_args(
                    "import.bulk_failed",
                    &[("error", &e.store_message())],
                ))
            }
        }
    }
}
