// ==========================================
// 测试辅助: 构造带内存服务的编辑会话
// ==========================================

use std::sync::Arc;

use labor_allocation::api::AllocationApi;
use labor_allocation::config::AllocationConfig;
use labor_allocation::domain::{LineField, LineId};
use labor_allocation::service::{InMemoryReferenceService, InMemorySubmissionService};

/// 构造未加载目录的会话
pub fn build_api() -> (
    AllocationApi,
    Arc<InMemoryReferenceService>,
    Arc<InMemorySubmissionService>,
) {
    let reference = Arc::new(InMemoryReferenceService::with_dummy_data());
    let submission = Arc::new(InMemorySubmissionService::new());
    let api = AllocationApi::new(
        reference.clone(),
        submission.clone(),
        AllocationConfig::default(),
    );
    (api, reference, submission)
}

/// 构造并完成目录加载的会话
pub async fn loaded_api() -> (
    AllocationApi,
    Arc<InMemoryReferenceService>,
    Arc<InMemorySubmissionService>,
) {
    let (mut api, reference, submission) = build_api();
    api.load_reference_data().await;
    (api, reference, submission)
}

/// 把指定行填成完整的项目行 (job 1 / phase 1) 并设置百分比
pub fn make_complete_job_line(api: &mut AllocationApi, id: LineId, percentage: Option<&str>) {
    api.update_field(id, LineField::JobId(Some(1))).unwrap();
    api.update_field(id, LineField::PhaseId(Some(1))).unwrap();
    api.update_field(id, LineField::Percentage(percentage.map(|s| s.to_string())))
        .unwrap();
}
