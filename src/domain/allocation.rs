// ==========================================
// 周工时分配系统 - 分配行模型
// ==========================================
// 职责: 分配行实体、字段更新归约器、行集合不变式
// 红线: percentage 规范单位永远是"周百分比", 不存小时数
// 红线: phase_id 只有在 job_id 已设置时才允许存在
// ==========================================

use serde::{Deserialize, Serialize};

use super::catalog::{CostCodeId, EquipmentId, Job, JobId, PhaseId, Week};
use super::types::{InputMode, LineKind, WorkLocation};

/// 分配行 ID, 会话内唯一且在编辑期间保持稳定
pub type LineId = u32;

// ==========================================
// 分配行 (Allocation Line)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub id: LineId,

    #[serde(rename = "job_type")]
    pub kind: LineKind,

    #[serde(default)]
    pub job_id: Option<JobId>,

    #[serde(default)]
    pub phase_id: Option<PhaseId>,

    #[serde(default)]
    pub equipment_id: Option<EquipmentId>,

    #[serde(default)]
    pub cost_code_id: Option<CostCodeId>,

    /// 带薪休假标记, 与项目工时互斥
    #[serde(default)]
    pub is_pto: bool,

    /// 周百分比十进制字符串; None 表示未填
    #[serde(default)]
    pub percentage: Option<String>,

    #[serde(default)]
    pub work_location: WorkLocation,
}

impl AllocationLine {
    /// 创建空白行
    pub fn blank(id: LineId) -> Self {
        Self {
            id,
            kind: LineKind::Job,
            job_id: None,
            phase_id: None,
            equipment_id: None,
            cost_code_id: None,
            is_pto: false,
            percentage: None,
            work_location: WorkLocation::Unset,
        }
    }

    /// 行是否"完整" (具备参与分摊/补满的识别字段)
    ///
    /// - Job 行: job + phase 均已选择
    /// - Mechanic 行: equipment + cost code 均已选择
    /// - PTO 行: 勾选了 PTO
    pub fn is_complete(&self) -> bool {
        if self.is_pto {
            return true;
        }
        match self.kind {
            LineKind::Job => self.job_id.is_some() && self.phase_id.is_some(),
            LineKind::Mechanic => {
                self.equipment_id.is_some() && self.cost_code_id.is_some()
            }
        }
    }

    /// 解析百分比, 未填或非法时按 0 处理
    pub fn percentage_value(&self) -> f64 {
        self.percentage
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    /// 字段更新归约器
    ///
    /// 级联规则:
    /// - 设置 job_id: 清空 phase_id; 非空时按外州规则重算 work_location
    /// - 切换 kind: 清空全部类型相关字段并重置 work_location
    /// - 勾选 PTO: 清空 job/phase (与项目工时互斥)
    /// - 设置 phase_id: job_id 未设置时忽略 (不变式保护)
    ///
    /// 返回需要预取阶段列表的项目 ID (设置了非空 job_id 时)
    pub fn apply_field(&mut self, field: LineField, jobs: &[Job]) -> Option<JobId> {
        match field {
            LineField::Kind(kind) => {
                self.kind = kind;
                self.job_id = None;
                self.phase_id = None;
                self.equipment_id = None;
                self.cost_code_id = None;
                self.is_pto = false;
                self.work_location = WorkLocation::Unset;
                None
            }
            LineField::JobId(job_id) => {
                self.job_id = job_id;
                self.phase_id = None;
                if let Some(id) = job_id {
                    let out_of_state = jobs
                        .iter()
                        .find(|j| j.id == id)
                        .map(|j| j.is_out_of_state)
                        .unwrap_or(false);
                    self.work_location = if out_of_state {
                        WorkLocation::Onsite
                    } else {
                        WorkLocation::Unset
                    };
                }
                job_id
            }
            LineField::PhaseId(phase_id) => {
                if self.job_id.is_some() {
                    self.phase_id = phase_id;
                }
                None
            }
            LineField::EquipmentId(equipment_id) => {
                self.equipment_id = equipment_id;
                None
            }
            LineField::CostCodeId(cost_code_id) => {
                self.cost_code_id = cost_code_id;
                None
            }
            LineField::Pto(flag) => {
                self.is_pto = flag;
                if flag {
                    self.job_id = None;
                    self.phase_id = None;
                }
                None
            }
            LineField::Percentage(value) => {
                self.percentage = value.filter(|s| !s.is_empty());
                None
            }
            LineField::WorkLocation(location) => {
                self.work_location = location;
                None
            }
        }
    }
}

// ==========================================
// 字段更新 (Line Field)
// ==========================================
// 以带标签的联合类型表达字段更新, 级联规则集中在归约器里,
// 避免出现"设了 phase 没设 job"之类的非法状态
#[derive(Debug, Clone, PartialEq)]
pub enum LineField {
    Kind(LineKind),
    JobId(Option<JobId>),
    PhaseId(Option<PhaseId>),
    EquipmentId(Option<EquipmentId>),
    CostCodeId(Option<CostCodeId>),
    Pto(bool),
    Percentage(Option<String>),
    WorkLocation(WorkLocation),
}

// ==========================================
// 分配行集合 (Allocation Set)
// ==========================================
// 插入顺序即显示顺序; "补满到 100" 按顺序取最后一个完整行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSet {
    lines: Vec<AllocationLine>,
    next_id: LineId,
}

impl AllocationSet {
    /// 创建含一个空白行的初始集合
    pub fn new() -> Self {
        Self {
            lines: vec![AllocationLine::blank(1)],
            next_id: 2,
        }
    }

    pub fn lines(&self) -> &[AllocationLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, id: LineId) -> Option<&AllocationLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut AllocationLine> {
        self.lines.iter_mut().find(|l| l.id == id)
    }

    /// 追加空白行, 返回新行 ID
    ///
    /// ID 来自单调递增计数器, 删除行后不会复用
    pub fn add_line(&mut self) -> LineId {
        let id = self.next_id;
        self.next_id += 1;
        self.lines.push(AllocationLine::blank(id));
        id
    }

    /// 删除指定行
    ///
    /// 集合始终保留至少一行: 删除仅剩的一行时为 no-op (不报错)。
    /// 返回是否实际删除。
    pub fn remove_line(&mut self, id: LineId) -> bool {
        if self.lines.len() <= 1 {
            return false;
        }
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        self.lines.len() < before
    }

    /// 追加已构造好的行 (批量添加使用), 分配新 ID 后入列
    pub fn push_line(&mut self, mut line: AllocationLine) -> LineId {
        let id = self.next_id;
        self.next_id += 1;
        line.id = id;
        self.lines.push(line);
        id
    }

    /// 整体替换 (复制上周使用), 行 ID 从 1 重新顺序编号
    pub fn replace_all(&mut self, lines: Vec<AllocationLine>) {
        self.lines = lines
            .into_iter()
            .enumerate()
            .map(|(idx, mut line)| {
                line.id = idx as LineId + 1;
                line
            })
            .collect();
        if self.lines.is_empty() {
            self.lines.push(AllocationLine::blank(1));
        }
        self.next_id = self.lines.len() as LineId + 1;
    }
}

impl Default for AllocationSet {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 周上下文 (Week Context)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekContext {
    /// 周可分配总工时 (默认 50 = 40 正常 + 10 加班)
    pub total_hours: f64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub input_mode: InputMode,
    pub current_week: Option<Week>,
}

impl Default for WeekContext {
    fn default() -> Self {
        Self {
            total_hours: 50.0,
            regular_hours: 40.0,
            overtime_hours: 10.0,
            input_mode: InputMode::Percentage,
            current_week: None,
        }
    }
}
