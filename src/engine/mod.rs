// ==========================================
// 周工时分配系统 - 引擎层
// ==========================================
// 职责: 实现换算/校验/批量操作的纯业务规则
// 红线: Engine 不做 I/O, 所有拒绝必须给出原因
// ==========================================

pub mod bulk;
pub mod conversion;
pub mod validation;

// 重导出核心引擎
pub use bulk::{BulkCore, FillError, FillPlan};
pub use conversion::ConversionCore;
pub use validation::{ValidationCore, TOLERANCE};
