// ==========================================
// 周工时分配系统 - 领域层
// ==========================================
// 职责: 实体与类型定义, 不含 I/O
// ==========================================

pub mod allocation;
pub mod catalog;
pub mod types;

// 重导出核心类型
pub use allocation::{AllocationLine, AllocationSet, LineField, LineId, WeekContext};
pub use catalog::{
    CostCode, CostCodeId, Equipment, EquipmentId, Job, JobId, Phase, PhaseId,
    PreviousAllocation, PreviousAllocationLine, Week, WeekId,
};
pub use types::{
    AllocationStatus, InputMode, LineKind, Notice, NoticeKind, PostState, WorkLocation,
};
