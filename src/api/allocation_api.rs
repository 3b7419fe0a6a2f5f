// ==========================================
// 周工时分配系统 - 分配编辑 API
// ==========================================
// 职责:
// - 持有编辑会话状态: 分配行集合、周上下文、目录缓存、单槽位消息
// - 编排字段级联更新、批量操作、草稿保存与正式提交
// 红线: 提交前必须通过总和校验; 同一时刻最多一个在途上报请求
// 说明: 所有变更发生在单一逻辑线程上, 唯一的挂起点是网络调用
// ==========================================

use std::sync::Arc;

use futures::future::join_all;

use crate::config::AllocationConfig;
use crate::domain::allocation::{AllocationLine, AllocationSet, LineField, LineId, WeekContext};
use crate::domain::catalog::{CostCode, Equipment, Job, JobId, Phase};
use crate::domain::types::{
    AllocationStatus, InputMode, LineKind, Notice, PostState, WorkLocation,
};
use crate::engine::bulk::{BulkCore, FillError};
use crate::engine::conversion::ConversionCore;
use crate::engine::validation::ValidationCore;
use crate::i18n::{t, t_with_args};
use crate::service::reference::{PhaseCache, ReferenceDataService};
use crate::service::submission::{PostAllocationRequest, SubmissionService};

use super::error::{ApiError, ApiResult};

// ==========================================
// AllocationApi - 编辑会话门面
// ==========================================
pub struct AllocationApi {
    reference: Arc<dyn ReferenceDataService>,
    submission: Arc<dyn SubmissionService>,

    set: AllocationSet,
    context: WeekContext,

    // 只读目录 (会话启动时加载, 失败时保持为空)
    jobs: Vec<Job>,
    equipment: Vec<Equipment>,
    cost_codes: Vec<CostCode>,

    /// 按 job_id 缓存的阶段列表, 懒加载, last-write-wins
    phase_cache: Arc<PhaseCache>,

    post_state: PostState,
    notice: Option<Notice>,
}

impl AllocationApi {
    pub fn new(
        reference: Arc<dyn ReferenceDataService>,
        submission: Arc<dyn SubmissionService>,
        config: AllocationConfig,
    ) -> Self {
        Self {
            reference,
            submission,
            set: AllocationSet::new(),
            context: config.week_context(),
            jobs: Vec::new(),
            equipment: Vec::new(),
            cost_codes: Vec::new(),
            phase_cache: Arc::new(PhaseCache::new()),
            post_state: PostState::Idle,
            notice: None,
        }
    }

    // ==========================================
    // 会话启动: 目录加载
    // ==========================================

    /// 并发加载四项目录数据
    ///
    /// 单项失败只影响对应目录 (保持为空) 并设置"请刷新"提示,
    /// 表单用部分目录继续工作, 不整体失败。
    pub async fn load_reference_data(&mut self) {
        let (jobs, week, equipment, cost_codes) = tokio::join!(
            self.reference.fetch_jobs(),
            self.reference.fetch_current_week(),
            self.reference.fetch_equipment(),
            self.reference.fetch_cost_codes(),
        );

        match jobs {
            Ok(rows) => self.jobs = rows,
            Err(err) => {
                tracing::warn!(error = %err, "项目目录加载失败");
                self.notice = Some(Notice::error(t("message.jobs_load_failed")));
            }
        }
        match week {
            Ok(row) => self.context.current_week = Some(row),
            Err(err) => {
                tracing::warn!(error = %err, "当前周加载失败");
                self.notice = Some(Notice::error(t("message.week_load_failed")));
            }
        }
        match equipment {
            Ok(rows) => self.equipment = rows,
            Err(err) => {
                tracing::warn!(error = %err, "设备目录加载失败");
                self.notice = Some(Notice::error(t("message.equipment_load_failed")));
            }
        }
        match cost_codes {
            Ok(rows) => self.cost_codes = rows,
            Err(err) => {
                tracing::warn!(error = %err, "成本代码目录加载失败");
                self.notice = Some(Notice::error(t("message.cost_codes_load_failed")));
            }
        }

        tracing::info!(
            jobs = self.jobs.len(),
            equipment = self.equipment.len(),
            cost_codes = self.cost_codes.len(),
            "目录加载完成"
        );
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn lines(&self) -> &[AllocationLine] {
        self.set.lines()
    }

    pub fn line(&self, id: LineId) -> Option<&AllocationLine> {
        self.set.line(id)
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn cost_codes(&self) -> &[CostCode] {
        &self.cost_codes
    }

    pub fn context(&self) -> &WeekContext {
        &self.context
    }

    /// 已缓存的指定项目阶段列表 (未缓存返回 None)
    pub fn phases_for(&self, job_id: JobId) -> Option<Vec<Phase>> {
        self.phase_cache.get(job_id)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// 清除当前消息 (用户点击关闭)
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn post_state(&self) -> PostState {
        self.post_state
    }

    pub fn total_percentage(&self) -> f64 {
        ValidationCore::total_percentage(self.set.lines())
    }

    pub fn is_submit_eligible(&self) -> bool {
        ValidationCore::is_submit_eligible(self.total_percentage())
    }

    /// 按当前显示模式格式化某行的展示值
    pub fn display_value(&self, id: LineId) -> Option<String> {
        self.set.line(id).map(|line| {
            ConversionCore::format_display_value(
                line.percentage.as_deref(),
                self.context.input_mode,
                self.context.total_hours,
            )
        })
    }

    /// 切换显示模式 (不触碰存储值)
    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.context.input_mode = mode;
    }

    // ==========================================
    // 行编辑
    // ==========================================

    /// 追加空白行, 返回新行 ID
    pub fn add_line(&mut self) -> LineId {
        self.set.add_line()
    }

    /// 删除指定行; 仅剩一行时为 no-op
    pub fn remove_line(&mut self, id: LineId) -> bool {
        self.set.remove_line(id)
    }

    /// 字段级更新, 应用归约器级联规则
    ///
    /// 设置非空 job_id 会触发该项目阶段列表的异步预取;
    /// 预取相对更新本身是 fire-and-forget, 更新永不等待网络。
    /// 必须在 Tokio 运行时内调用。
    pub fn update_field(&mut self, id: LineId, field: LineField) -> ApiResult<()> {
        let jobs = &self.jobs;
        let line = self.set.line_mut(id).ok_or(ApiError::LineNotFound(id))?;
        if let Some(job_id) = line.apply_field(field, jobs) {
            self.spawn_phase_prefetch(job_id);
        }
        Ok(())
    }

    /// 按当前显示模式处理百分比/小时输入
    ///
    /// 小时模式下越界输入被静默拒绝 (存储值不变)。
    pub fn update_percentage_input(&mut self, id: LineId, raw: &str) -> ApiResult<()> {
        let stored = match self.context.input_mode {
            InputMode::Percentage => Some(ConversionCore::parse_percentage_input(raw)),
            InputMode::Hours => {
                ConversionCore::parse_hours_input(raw, self.context.total_hours)
            }
        };
        if let Some(value) = stored {
            self.update_field(id, LineField::Percentage(value))?;
        }
        Ok(())
    }

    /// 后台预取阶段列表, 结果写入会话缓存
    ///
    /// 用户快速切换项目时多个预取可能并发, 缓存按 job_id
    /// last-write-wins; 迟到的过期结果只是填充一个不再展示的
    /// 缓存项, 无需清理。
    fn spawn_phase_prefetch(&self, job_id: JobId) {
        let reference = Arc::clone(&self.reference);
        let cache = Arc::clone(&self.phase_cache);
        tokio::spawn(async move {
            match reference.fetch_phases(job_id).await {
                Ok(phases) => {
                    tracing::debug!(job_id, count = phases.len(), "阶段列表已缓存");
                    cache.insert(job_id, phases);
                }
                Err(err) => {
                    tracing::warn!(job_id, error = %err, "阶段列表预取失败");
                }
            }
        });
    }

    /// 同步等待指定项目的阶段列表 (批量添加/复制上周使用)
    ///
    /// 总是重新获取并覆盖缓存, 保证"先有阶段再自动选择"的顺序。
    /// 获取失败按空列表处理 (不中断所属批量操作, 阶段留待用户手动选择)。
    async fn ensure_phases(&self, job_id: JobId) -> Vec<Phase> {
        match self.reference.fetch_phases(job_id).await {
            Ok(phases) => {
                self.phase_cache.insert(job_id, phases.clone());
                phases
            }
            Err(err) => {
                tracing::warn!(job_id, error = %err, "阶段列表获取失败, 按空列表处理");
                Vec::new()
            }
        }
    }

    // ==========================================
    // 批量操作
    // ==========================================

    /// 平均分摊: 完整行各得 100/|E| (2 位小数, 残差不回补)
    ///
    /// 没有完整行时为 no-op。
    pub fn distribute_evenly(&mut self) {
        let plan = BulkCore::distribute_evenly(self.set.lines());
        if plan.is_empty() {
            return;
        }
        for (line_id, value) in plan {
            if let Some(line) = self.set.line_mut(line_id) {
                line.percentage = Some(value);
            }
        }
        let key = match self.context.input_mode {
            InputMode::Percentage => "message.distribute_success_percentage",
            InputMode::Hours => "message.distribute_success_hours",
        };
        self.notice = Some(Notice::success(t(key)));
    }

    /// 补满到 100: 剩余量加到最后一个完整行
    pub fn fill_to_hundred(&mut self) -> ApiResult<()> {
        match BulkCore::fill_to_hundred(self.set.lines()) {
            Ok(plan) => {
                let amount = match self.context.input_mode {
                    InputMode::Percentage => format!("{:.2}%", plan.added),
                    InputMode::Hours => format!(
                        "{:.1} hours",
                        ConversionCore::percentage_to_hours(
                            plan.added,
                            self.context.total_hours
                        )
                    ),
                };
                let target = match self.context.input_mode {
                    InputMode::Percentage => "100%".to_string(),
                    InputMode::Hours => {
                        format!("{} hours", format_hours(self.context.total_hours))
                    }
                };
                if let Some(line) = self.set.line_mut(plan.line_id) {
                    line.percentage = Some(plan.new_percentage);
                }
                self.notice = Some(Notice::success(t_with_args(
                    "message.fill_success",
                    &[("amount", &amount), ("target", &target)],
                )));
                Ok(())
            }
            Err(FillError::TotalAlreadyFull { total }) => {
                let text = t("message.fill_over_total");
                self.notice = Some(Notice::error(text.clone()));
                tracing::warn!(total, "补满被拒绝: 总和已达标");
                Err(ApiError::BulkOperationFailed(text))
            }
            Err(FillError::NoCompleteLine) => {
                let text = t("message.fill_no_valid_lines");
                self.notice = Some(Notice::error(text.clone()));
                Err(ApiError::BulkOperationFailed(text))
            }
        }
    }

    /// 按项目号批量添加分配行
    ///
    /// 输入按逗号/空白切分; 每个 token 与 erp_job_id 精确匹配,
    /// 匹配行等待阶段列表加载后自动选中第一个阶段。
    /// 未匹配 token 被静默跳过, 只汇报实际添加的行数;
    /// 一行都没加上时返回聚合错误。调用方仅在成功时清空输入框。
    pub async fn bulk_add_jobs(&mut self, input: &str) -> ApiResult<usize> {
        let tokens = BulkCore::parse_job_tokens(input);
        if tokens.is_empty() {
            return Ok(0);
        }

        let mut added = 0usize;
        for token in tokens {
            let job = match self.jobs.iter().find(|j| j.erp_job_id == token) {
                Some(job) => job.clone(),
                None => continue,
            };

            let phases = self.ensure_phases(job.id).await;
            let first_phase = phases.first().map(|p| p.id);

            let mut line = AllocationLine::blank(0);
            line.kind = LineKind::Job;
            line.job_id = Some(job.id);
            line.phase_id = first_phase;
            line.work_location = if job.is_out_of_state {
                WorkLocation::Onsite
            } else {
                WorkLocation::Unset
            };
            self.set.push_line(line);
            added += 1;
        }

        if added > 0 {
            self.notice = Some(Notice::success(t_with_args(
                "message.bulk_add_success",
                &[("count", &added.to_string())],
            )));
            tracing::info!(added, "批量添加完成");
            Ok(added)
        } else {
            let text = t("message.bulk_add_no_match");
            self.notice = Some(Notice::error(text.clone()));
            Err(ApiError::BulkOperationFailed(text))
        }
    }

    /// 复制上周分配: 整体替换当前集合 (非合并), 行 ID 从 1 重编
    pub async fn load_previous_allocation(&mut self) -> ApiResult<()> {
        let previous = match self.reference.fetch_previous_allocation().await {
            Ok(prev) => prev,
            Err(err) => {
                tracing::warn!(error = %err, "上周分配加载失败");
                self.notice = Some(Notice::error(t("message.previous_load_failed")));
                return Err(err.into());
            }
        };

        // 先并发预取所有引用到的项目阶段, 再替换集合;
        // 单个项目的预取失败不阻断复制
        let job_ids = previous.distinct_job_ids();
        join_all(job_ids.iter().map(|&job_id| self.ensure_phases(job_id))).await;

        let lines: Vec<AllocationLine> = previous
            .allocations
            .iter()
            .map(|record| {
                let mut line = AllocationLine::blank(0);
                line.kind = if record.equipment_id.is_some() {
                    LineKind::Mechanic
                } else {
                    LineKind::Job
                };
                line.job_id = record.job_id;
                line.phase_id = record.phase_id;
                line.equipment_id = record.equipment_id;
                line.cost_code_id = record.cost_code_id;
                line.is_pto = record.is_pto;
                line.percentage = record.percentage.clone();
                line.work_location = match record.job_id {
                    Some(job_id)
                        if self
                            .jobs
                            .iter()
                            .any(|j| j.id == job_id && j.is_out_of_state) =>
                    {
                        WorkLocation::Onsite
                    }
                    _ => WorkLocation::Unset,
                };
                line
            })
            .collect();

        self.set.replace_all(lines);
        self.notice = Some(Notice::success(t("message.previous_loaded")));
        tracing::info!(lines = self.set.len(), "上周分配已载入");
        Ok(())
    }

    // ==========================================
    // 提交协调
    // ==========================================

    /// 保存草稿: 不校验总和, 永远允许
    pub async fn save_draft(&mut self) -> ApiResult<()> {
        self.post(AllocationStatus::Draft).await
    }

    /// 正式提交: 总和不在 100±0.01 内时本地拒绝, 不发起网络调用
    pub async fn submit(&mut self) -> ApiResult<()> {
        let total = self.total_percentage();
        if !ValidationCore::is_submit_eligible(total) {
            let text = match self.context.input_mode {
                InputMode::Percentage => t("message.total_must_equal_percentage"),
                InputMode::Hours => t_with_args(
                    "message.total_must_equal_hours",
                    &[("hours", &format_hours(self.context.total_hours))],
                ),
            };
            self.notice = Some(Notice::error(text.clone()));
            tracing::warn!(total, "提交被本地拒绝: 总和未达标");
            return Err(ApiError::ValidationFailed(text));
        }
        self.post(AllocationStatus::Submitted).await
    }

    /// 上报当前分配单
    ///
    /// 状态门控: Saving/Submitting 互斥, 在途期间再次调用被拒绝。
    /// 失败时仅给出通用提示并回到 Idle, 内存中的分配集合保持不变。
    async fn post(&mut self, status: AllocationStatus) -> ApiResult<()> {
        if !self.post_state.is_idle() {
            let text = t("message.operation_in_flight");
            self.notice = Some(Notice::error(text));
            return Err(ApiError::OperationInFlight(
                self.post_state.as_str().to_string(),
            ));
        }

        self.post_state = match status {
            AllocationStatus::Draft => PostState::Saving,
            AllocationStatus::Submitted => PostState::Submitting,
        };
        self.notice = None;

        let request = PostAllocationRequest {
            week_id: self.context.current_week.as_ref().map(|w| w.id),
            allocations: self.set.lines().to_vec(),
            status,
        };

        let result = self.submission.post_allocation(request).await;
        self.post_state = PostState::Idle;

        let (success_key, failure_key) = match status {
            AllocationStatus::Draft => ("message.draft_saved", "message.draft_save_failed"),
            AllocationStatus::Submitted => ("message.submit_success", "message.submit_failed"),
        };

        match result {
            Ok(response) if response.success => {
                tracing::info!(%status, timestamp = %response.timestamp, "上报成功");
                self.notice = Some(Notice::success(t(success_key)));
                Ok(())
            }
            Ok(response) => {
                tracing::warn!(%status, message = %response.message, "上报被服务端拒绝");
                let text = t(failure_key);
                self.notice = Some(Notice::error(text.clone()));
                Err(ApiError::PostRejected(response.message))
            }
            Err(err) => {
                tracing::warn!(%status, error = %err, "上报传输失败");
                self.notice = Some(Notice::error(t(failure_key)));
                Err(err.into())
            }
        }
    }
}

/// 整小时不带小数点地格式化总工时 (50.0 → "50")
fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}", hours as i64)
    } else {
        format!("{:.1}", hours)
    }
}
