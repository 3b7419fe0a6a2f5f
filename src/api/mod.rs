// ==========================================
// 周工时分配系统 - API 层
// ==========================================
// 职责: 提供编辑会话门面, 供宿主应用 (UI 层) 调用
// ==========================================

pub mod allocation_api;
pub mod error;

// 重导出核心类型
pub use allocation_api::AllocationApi;
pub use error::{ApiError, ApiResult};
