// ==========================================
// 周工时分配系统 - Validation Core 纯函数库
// ==========================================
// 职责: 计算分配总和, 判定是否达到可提交状态
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::allocation::AllocationLine;

/// 提交容差: 吸收百分比/小时往返换算产生的舍入误差
pub const TOLERANCE: f64 = 0.01;

// ==========================================
// ValidationCore - 纯函数工具类
// ==========================================
pub struct ValidationCore;

impl ValidationCore {
    /// 计算当前总百分比
    ///
    /// # 规则
    /// - total = Σ parse(percentage), 未填/非法按 0
    pub fn total_percentage(lines: &[AllocationLine]) -> f64 {
        lines.iter().map(|l| l.percentage_value()).sum()
    }

    /// 是否达到可提交状态
    ///
    /// # 规则
    /// - |total - 100| <= 0.01
    /// - 只约束提交, 存草稿永远允许
    pub fn is_submit_eligible(total: f64) -> bool {
        (total - 100.0).abs() <= TOLERANCE
    }

    /// 按总工时换算当前已分配小时数 (用于小时模式展示)
    pub fn total_hours(total_percentage: f64, total_hours: f64) -> f64 {
        total_percentage / 100.0 * total_hours
    }
}
