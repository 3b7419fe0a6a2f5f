// ==========================================
// 周工时分配系统 - Bulk Core 纯函数库
// ==========================================
// 职责: 平均分摊、补满到 100、批量项目号解析的纯规划逻辑
// 红线: 无状态、无副作用、无 I/O 操作
// 说明: 只产出"更新计划", 集合的实际变更由 API 层应用
// ==========================================

use thiserror::Error;

use crate::domain::allocation::{AllocationLine, LineId};
use crate::engine::validation::ValidationCore;

/// 补满到 100 的失败原因
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FillError {
    /// 当前总和已达到或超过 100
    #[error("total already at or above 100: {total:.2}")]
    TotalAlreadyFull { total: f64 },

    /// 没有完整行可以承接剩余百分比
    #[error("no complete line to receive the remainder")]
    NoCompleteLine,
}

/// 补满计划: 目标行及其新百分比
#[derive(Debug, Clone, PartialEq)]
pub struct FillPlan {
    pub line_id: LineId,
    pub new_percentage: String,
    /// 本次补上的量 (提示消息使用)
    pub added: f64,
}

// ==========================================
// BulkCore - 纯函数工具类
// ==========================================
pub struct BulkCore;

impl BulkCore {
    /// 平均分摊计划
    ///
    /// # 规则
    /// - E = 完整行集合; E 为空时返回空计划 (no-op)
    /// - E 中每行得到 100/|E|, 保留 2 位小数
    /// - 舍入残差不做回补 (保持原始行为)
    /// - 不完整行不受影响
    pub fn distribute_evenly(lines: &[AllocationLine]) -> Vec<(LineId, String)> {
        let complete: Vec<&AllocationLine> =
            lines.iter().filter(|l| l.is_complete()).collect();
        if complete.is_empty() {
            return Vec::new();
        }
        let even = format!("{:.2}", 100.0 / complete.len() as f64);
        complete
            .iter()
            .map(|l| (l.id, even.clone()))
            .collect()
    }

    /// 补满到 100 的计划
    ///
    /// # 规则
    /// - 总和 >= 100: 拒绝, 不产生任何变更
    /// - 无完整行: 拒绝, 不产生任何变更
    /// - 否则: remaining = 100 - total, 加到顺序上最后一个完整行的
    ///   现有百分比上 (累加, 不是替换), 保留 2 位小数
    pub fn fill_to_hundred(lines: &[AllocationLine]) -> Result<FillPlan, FillError> {
        let total = ValidationCore::total_percentage(lines);
        if total >= 100.0 {
            return Err(FillError::TotalAlreadyFull { total });
        }

        let target = lines
            .iter()
            .rev()
            .find(|l| l.is_complete())
            .ok_or(FillError::NoCompleteLine)?;

        let remaining = 100.0 - total;
        let new_value = target.percentage_value() + remaining;
        Ok(FillPlan {
            line_id: target.id,
            new_percentage: format!("{:.2}", new_value),
            added: remaining,
        })
    }

    /// 解析批量添加输入: 按逗号/空白切分为项目号 token
    pub fn parse_job_tokens(input: &str) -> Vec<&str> {
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
