// ==========================================
// 周工时分配系统 - 内存版服务实现
// ==========================================
// 职责: 提供开发/测试用的内存目录与上报实现
// 说明: 目录内容与开发环境的静态数据一致; 支持按端点注入失败,
//       上报实现会记录收到的请求, 便于断言"未发起网络调用"
// ==========================================

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{Datelike, Duration, Local, Utc};

use crate::domain::types::AllocationStatus;
use crate::domain::catalog::{
    CostCode, Equipment, Job, JobId, Phase, PreviousAllocation, PreviousAllocationLine, Week,
};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::reference::ReferenceDataService;
use crate::service::submission::{
    PostAllocationRequest, PostAllocationResponse, SubmissionService,
};

// ==========================================
// 内存目录服务
// ==========================================
pub struct InMemoryReferenceService {
    jobs: Vec<Job>,
    phases: Vec<Phase>,
    equipment: Vec<Equipment>,
    cost_codes: Vec<CostCode>,
    previous: PreviousAllocation,
    failing_endpoints: Mutex<HashSet<&'static str>>,
}

impl InMemoryReferenceService {
    /// 构造带开发静态数据的服务
    pub fn with_dummy_data() -> Self {
        let jobs = vec![
            Job {
                id: 1,
                erp_job_id: "3012".to_string(),
                name: "Office Building - Downtown".to_string(),
                active_flag: true,
                is_out_of_state: false,
                home_state: "UT".to_string(),
                job_state: "UT".to_string(),
            },
            Job {
                id: 2,
                erp_job_id: "3025".to_string(),
                name: "Warehouse Complex - North".to_string(),
                active_flag: true,
                is_out_of_state: false,
                home_state: "UT".to_string(),
                job_state: "UT".to_string(),
            },
            Job {
                id: 3,
                erp_job_id: "3048".to_string(),
                name: "Shopping Center - West".to_string(),
                active_flag: true,
                is_out_of_state: true,
                home_state: "UT".to_string(),
                job_state: "NV".to_string(),
            },
            Job {
                id: 4,
                erp_job_id: "3052".to_string(),
                name: "Residential Tower - East".to_string(),
                active_flag: false,
                is_out_of_state: false,
                home_state: "UT".to_string(),
                job_state: "UT".to_string(),
            },
        ];

        let phases = vec![
            Phase { id: 1, job_id: 1, code: "100".to_string(), name: "Site Preparation".to_string(), active_flag: true },
            Phase { id: 2, job_id: 1, code: "200".to_string(), name: "Foundation".to_string(), active_flag: true },
            Phase { id: 3, job_id: 1, code: "300".to_string(), name: "Structure".to_string(), active_flag: true },
            Phase { id: 4, job_id: 2, code: "100".to_string(), name: "Site Preparation".to_string(), active_flag: true },
            Phase { id: 5, job_id: 2, code: "200".to_string(), name: "Foundation".to_string(), active_flag: true },
            Phase { id: 6, job_id: 3, code: "100".to_string(), name: "Site Preparation".to_string(), active_flag: true },
            Phase { id: 7, job_id: 3, code: "400".to_string(), name: "MEP".to_string(), active_flag: true },
        ];

        let equipment = vec![
            Equipment { id: 1, equipment_id: "EX-210".to_string(), name: "Excavator 210".to_string(), active_flag: true },
            Equipment { id: 2, equipment_id: "CR-080".to_string(), name: "Crane 80t".to_string(), active_flag: true },
            Equipment { id: 3, equipment_id: "LD-950".to_string(), name: "Loader 950".to_string(), active_flag: true },
        ];

        let cost_codes = vec![
            CostCode { id: 1, code: "M100".to_string(), name: "Preventive Maintenance".to_string(), active_flag: true },
            CostCode { id: 2, code: "M200".to_string(), name: "Repair".to_string(), active_flag: true },
            CostCode { id: 3, code: "M300".to_string(), name: "Inspection".to_string(), active_flag: true },
        ];

        // 上周: job 1 阶段 2 占 60%, job 2 阶段 4 占 40%
        let previous = PreviousAllocation {
            week_id: 0,
            allocations: vec![
                PreviousAllocationLine {
                    job_id: Some(1),
                    phase_id: Some(2),
                    equipment_id: None,
                    cost_code_id: None,
                    is_pto: false,
                    percentage: Some("60".to_string()),
                },
                PreviousAllocationLine {
                    job_id: Some(2),
                    phase_id: Some(4),
                    equipment_id: None,
                    cost_code_id: None,
                    is_pto: false,
                    percentage: Some("40".to_string()),
                },
            ],
        };

        Self {
            jobs,
            phases,
            equipment,
            cost_codes,
            previous,
            failing_endpoints: Mutex::new(HashSet::new()),
        }
    }

    /// 注入端点失败 (jobs/phases/equipment/cost_codes/current_week/previous_allocation)
    pub fn fail_endpoint(&self, endpoint: &'static str) {
        self.failing_endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(endpoint);
    }

    fn check(&self, endpoint: &'static str) -> ServiceResult<()> {
        let failing = self
            .failing_endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(endpoint);
        if failing {
            return Err(ServiceError::UnexpectedStatus {
                status: 503,
                endpoint: endpoint.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ReferenceDataService for InMemoryReferenceService {
    async fn fetch_jobs(&self) -> ServiceResult<Vec<Job>> {
        self.check("jobs")?;
        Ok(self.jobs.iter().filter(|j| j.active_flag).cloned().collect())
    }

    async fn fetch_phases(&self, job_id: JobId) -> ServiceResult<Vec<Phase>> {
        self.check("phases")?;
        Ok(self
            .phases
            .iter()
            .filter(|p| p.job_id == job_id && p.active_flag)
            .cloned()
            .collect())
    }

    async fn fetch_equipment(&self) -> ServiceResult<Vec<Equipment>> {
        self.check("equipment")?;
        Ok(self
            .equipment
            .iter()
            .filter(|e| e.active_flag)
            .cloned()
            .collect())
    }

    async fn fetch_cost_codes(&self) -> ServiceResult<Vec<CostCode>> {
        self.check("cost_codes")?;
        Ok(self
            .cost_codes
            .iter()
            .filter(|c| c.active_flag)
            .cloned()
            .collect())
    }

    async fn fetch_current_week(&self) -> ServiceResult<Week> {
        self.check("current_week")?;
        // 周日为一周起点, 与服务端口径一致
        let today = Local::now().date_naive();
        let start = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
        let end = start + Duration::days(6);
        Ok(Week {
            id: 1,
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            status: "open".to_string(),
        })
    }

    async fn fetch_previous_allocation(&self) -> ServiceResult<PreviousAllocation> {
        self.check("previous_allocation")?;
        Ok(self.previous.clone())
    }
}

// ==========================================
// 内存上报服务
// ==========================================
// 记录所有收到的请求; 测试用它断言"本地拒绝时没有网络调用"
#[derive(Default)]
pub struct InMemorySubmissionService {
    received: Mutex<Vec<PostAllocationRequest>>,
    fail_next: AtomicBool,
}

impl InMemorySubmissionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注入失败: 后续上报按传输失败处理
    pub fn set_failing(&self, failing: bool) {
        self.fail_next.store(failing, Ordering::SeqCst);
    }

    /// 收到的请求数
    pub fn request_count(&self) -> usize {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// 收到的全部请求副本
    pub fn received(&self) -> Vec<PostAllocationRequest> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SubmissionService for InMemorySubmissionService {
    async fn post_allocation(
        &self,
        request: PostAllocationRequest,
    ) -> ServiceResult<PostAllocationResponse> {
        if self.fail_next.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport("connection refused".to_string()));
        }

        let status = request.status;
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let message = match status {
            AllocationStatus::Draft => {
                "Draft saved successfully. You can continue editing until submission."
            }
            AllocationStatus::Submitted => {
                "Time allocation submitted successfully! Manager notification sent."
            }
        };

        Ok(PostAllocationResponse {
            success: true,
            message: message.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inactive_rows_filtered_out() {
        let service = InMemoryReferenceService::with_dummy_data();
        let jobs = service.fetch_jobs().await.unwrap();
        assert_eq!(jobs.len(), 3);
        assert!(jobs.iter().all(|j| j.active_flag));
    }

    #[tokio::test]
    async fn test_phases_scoped_to_job() {
        let service = InMemoryReferenceService::with_dummy_data();
        let phases = service.fetch_phases(3).await.unwrap();
        assert_eq!(phases.len(), 2);
        assert!(phases.iter().all(|p| p.job_id == 3));

        let none = service.fetch_phases(999).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_endpoint_failure_injection() {
        let service = InMemoryReferenceService::with_dummy_data();
        service.fail_endpoint("jobs");
        assert!(service.fetch_jobs().await.is_err());
        // 其它端点不受影响
        assert!(service.fetch_equipment().await.is_ok());
    }

    #[tokio::test]
    async fn test_submission_records_requests() {
        let service = InMemorySubmissionService::new();
        assert_eq!(service.request_count(), 0);

        let request = PostAllocationRequest {
            week_id: Some(1),
            allocations: Vec::new(),
            status: AllocationStatus::Draft,
        };
        let response = service.post_allocation(request).await.unwrap();
        assert!(response.success);
        assert_eq!(service.request_count(), 1);

        service.set_failing(true);
        let request = PostAllocationRequest {
            week_id: Some(1),
            allocations: Vec::new(),
            status: AllocationStatus::Submitted,
        };
        assert!(service.post_allocation(request).await.is_err());
        assert_eq!(service.request_count(), 1);
    }
}
