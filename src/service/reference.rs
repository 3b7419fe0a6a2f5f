// ==========================================
// 周工时分配系统 - 参考数据服务接口
// ==========================================
// 职责: 定义只读目录数据的获取接口与会话内阶段缓存
// 说明: 服务端只返回 active 行; 核心对目录无写权限
// ==========================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::catalog::{
    CostCode, Equipment, Job, JobId, Phase, PreviousAllocation, Week,
};
use crate::service::error::ServiceResult;

// ==========================================
// ReferenceDataService Trait
// ==========================================
// 用途: 目录数据获取主接口
// 实现者: InMemoryReferenceService (演示/测试), HTTP 客户端 (宿主应用)
#[async_trait]
pub trait ReferenceDataService: Send + Sync {
    /// 获取全部有效施工项目
    async fn fetch_jobs(&self) -> ServiceResult<Vec<Job>>;

    /// 获取指定项目的有效阶段列表
    async fn fetch_phases(&self, job_id: JobId) -> ServiceResult<Vec<Phase>>;

    /// 获取全部有效设备
    async fn fetch_equipment(&self) -> ServiceResult<Vec<Equipment>>;

    /// 获取全部有效成本代码
    async fn fetch_cost_codes(&self) -> ServiceResult<Vec<CostCode>>;

    /// 获取当前填报周
    async fn fetch_current_week(&self) -> ServiceResult<Week>;

    /// 获取上一周的分配记录
    async fn fetch_previous_allocation(&self) -> ServiceResult<PreviousAllocation>;
}

// ==========================================
// PhaseCache - 会话内阶段缓存
// ==========================================
// 按 job_id 缓存; 阶段是不可变参考数据, 并发获取时
// 后写覆盖先写 (last-write-wins) 是可接受的
#[derive(Debug, Default)]
pub struct PhaseCache {
    inner: Mutex<HashMap<JobId, Vec<Phase>>>,
}

impl PhaseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取锁; 缓存数据不可变, 中毒后数据仍然可用
    fn guard(&self) -> MutexGuard<'_, HashMap<JobId, Vec<Phase>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 写入指定项目的阶段列表 (覆盖旧值)
    pub fn insert(&self, job_id: JobId, phases: Vec<Phase>) {
        self.guard().insert(job_id, phases);
    }

    /// 读取缓存 (未命中返回 None)
    pub fn get(&self, job_id: JobId) -> Option<Vec<Phase>> {
        self.guard().get(&job_id).cloned()
    }

    pub fn contains(&self, job_id: JobId) -> bool {
        self.guard().contains_key(&job_id)
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
