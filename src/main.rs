// ==========================================
// 周工时分配系统 - 演示入口
// ==========================================
// 职责: 用内存服务跑一个完整的填报会话, 展示核心流程
// ==========================================

use std::sync::Arc;

use labor_allocation::api::AllocationApi;
use labor_allocation::config::AllocationConfig;
use labor_allocation::domain::{LineField, LineKind};
use labor_allocation::logging;
use labor_allocation::service::{InMemoryReferenceService, InMemorySubmissionService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("周工时分配系统 - 填报核心演示");
    tracing::info!("系统版本: {}", labor_allocation::VERSION);
    tracing::info!("==================================================");

    let reference = Arc::new(InMemoryReferenceService::with_dummy_data());
    let submission = Arc::new(InMemorySubmissionService::new());
    let mut api = AllocationApi::new(
        reference.clone(),
        submission.clone(),
        AllocationConfig::default(),
    );

    api.load_reference_data().await;
    if let Some(week) = &api.context().current_week {
        tracing::info!("当前填报周: {} ~ {}", week.start_date, week.end_date);
    }

    // 批量添加两个项目, 再补一行机修工时
    let added = api.bulk_add_jobs("3012, 9999, 3048").await?;
    tracing::info!("批量添加 {} 行 (9999 无匹配, 被跳过)", added);

    let mech = api.add_line();
    api.update_field(mech, LineField::Kind(LineKind::Mechanic))?;
    api.update_field(mech, LineField::EquipmentId(Some(1)))?;
    api.update_field(mech, LineField::CostCodeId(Some(2)))?;

    // 初始空白行没有选择任何内容, 删掉
    api.remove_line(1);

    // 平均分摊后补满到 100
    api.distribute_evenly();
    tracing::info!("分摊后总和: {:.2}%", api.total_percentage());
    if let Err(err) = api.fill_to_hundred() {
        tracing::warn!("补满失败: {}", err);
    }
    tracing::info!("补满后总和: {:.2}%", api.total_percentage());

    // 先存草稿再正式提交
    api.save_draft().await?;
    api.submit().await?;

    if let Some(notice) = api.notice() {
        tracing::info!("最终消息: {}", notice.text);
    }
    tracing::info!("服务端共收到 {} 次上报", submission.request_count());

    Ok(())
}
