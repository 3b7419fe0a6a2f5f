// ==========================================
// 周工时分配系统 - 服务层
// ==========================================
// 职责: 外部服务访问接口 (目录读取 / 分配上报)
// 说明: HTTP 传输由宿主应用实现, 核心只依赖 trait
// ==========================================

pub mod error;
pub mod memory;
pub mod reference;
pub mod submission;

// 重导出核心类型
pub use error::{ServiceError, ServiceResult};
pub use memory::{InMemoryReferenceService, InMemorySubmissionService};
pub use reference::{PhaseCache, ReferenceDataService};
pub use submission::{PostAllocationRequest, PostAllocationResponse, SubmissionService};
