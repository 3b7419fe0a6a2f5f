// ==========================================
// 周工时分配系统 - 分配提交服务接口
// ==========================================
// 职责: 定义草稿保存/正式提交的上报接口与线上数据结构
// 说明: 一次只允许一个在途请求, 由 API 层的状态门控保证
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::allocation::AllocationLine;
use crate::domain::catalog::WeekId;
use crate::domain::types::AllocationStatus;
use crate::service::error::ServiceResult;

/// 上报请求体: {week_id, allocations, status}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAllocationRequest {
    pub week_id: Option<WeekId>,
    pub allocations: Vec<AllocationLine>,
    pub status: AllocationStatus,
}

/// 上报响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAllocationResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    pub status: AllocationStatus,
}

// ==========================================
// SubmissionService Trait
// ==========================================
// 用途: 分配单上报主接口
// 实现者: InMemorySubmissionService (演示/测试), HTTP 客户端 (宿主应用)
#[async_trait]
pub trait SubmissionService: Send + Sync {
    /// 上报分配单
    ///
    /// # 规则
    /// - 传输失败或非成功响应统一按失败处理, 不做自动重试
    async fn post_allocation(
        &self,
        request: PostAllocationRequest,
    ) -> ServiceResult<PostAllocationResponse>;
}
