// ==========================================
// 表管理工具 - 领域模型层
// ==========================================
// 职责: 定义行集合、列映射、目标表结构、操作结果
// 红线: 不含数据访问逻辑，不含导入流水线逻辑
// ==========================================

pub mod mapping;
pub mod outcome;
pub mod row_set;
pub mod schema;
pub mod value;

// 重导出核心类型
pub use mapping::{ColumnMapping, MappingTarget};
pub use outcome::OperationResult;
pub use row_set::{Record, RowSet};
pub use schema::{DestinationSchema, SchemaOrigin};
pub use value::CellValue;
