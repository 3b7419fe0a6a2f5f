// ==========================================
// 周工时分配系统 - 参考目录实体
// ==========================================
// 职责: 定义外部服务提供的只读目录数据结构
// 说明: 目录数据由外部服务独占维护, 核心只读不写
// ==========================================

use serde::{Deserialize, Serialize};

/// 项目 ID 等目录主键均为外部服务分配的整型 ID
pub type JobId = i64;
pub type PhaseId = i64;
pub type EquipmentId = i64;
pub type CostCodeId = i64;
pub type WeekId = i64;

// ==========================================
// 施工项目 (Job)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// ERP 侧的项目编号, 批量添加按此精确匹配
    pub erp_job_id: String,
    pub name: String,
    pub active_flag: bool,
    /// 外州项目: 需要员工选择工作地点 (onsite/remote)
    #[serde(default)]
    pub is_out_of_state: bool,
    #[serde(default)]
    pub home_state: String,
    #[serde(default)]
    pub job_state: String,
}

// ==========================================
// 施工阶段 (Phase)
// ==========================================
// 按项目懒加载, 会话内按 job_id 缓存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub job_id: JobId,
    pub code: String,
    pub name: String,
    pub active_flag: bool,
}

// ==========================================
// 设备 (Equipment)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub equipment_id: String,
    pub name: String,
    pub active_flag: bool,
}

// ==========================================
// 成本代码 (Cost Code)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCode {
    pub id: CostCodeId,
    pub code: String,
    pub name: String,
    pub active_flag: bool,
}

// ==========================================
// 填报周 (Week)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub id: WeekId,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
}

// ==========================================
// 上周分配 (Previous Allocation)
// ==========================================

/// 上周分配中的一行记录
///
/// 百分比保持十进制字符串, 与分配行的规范单位一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousAllocationLine {
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub phase_id: Option<PhaseId>,
    #[serde(default)]
    pub equipment_id: Option<EquipmentId>,
    #[serde(default)]
    pub cost_code_id: Option<CostCodeId>,
    #[serde(default)]
    pub is_pto: bool,
    #[serde(default)]
    pub percentage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousAllocation {
    pub week_id: WeekId,
    pub allocations: Vec<PreviousAllocationLine>,
}

impl PreviousAllocation {
    /// 返回记录中引用到的去重后的项目 ID 列表 (保持首次出现顺序)
    pub fn distinct_job_ids(&self) -> Vec<JobId> {
        let mut seen = Vec::new();
        for line in &self.allocations {
            if let Some(job_id) = line.job_id {
                if !seen.contains(&job_id) {
                    seen.push(job_id);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_job_ids_preserves_order() {
        let prev = PreviousAllocation {
            week_id: 0,
            allocations: vec![
                PreviousAllocationLine {
                    job_id: Some(2),
                    phase_id: Some(4),
                    equipment_id: None,
                    cost_code_id: None,
                    is_pto: false,
                    percentage: Some("40".to_string()),
                },
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
                    phase_id: Some(5),
                    equipment_id: None,
                    cost_code_id: None,
                    is_pto: false,
                    percentage: None,
                },
            ],
        };

        assert_eq!(prev.distinct_job_ids(), vec![2, 1]);
    }
}
