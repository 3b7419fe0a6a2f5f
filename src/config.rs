// ==========================================
// 周工时分配系统 - 配置
// ==========================================
// 职责: 周工时口径配置 (正常/加班/总工时)
// 默认: 50 = 40 正常 + 10 加班
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::allocation::WeekContext;
use crate::domain::types::InputMode;

/// 会话配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub regular_hours: f64,
    pub overtime_hours: f64,
    /// 初始显示模式
    #[serde(default)]
    pub input_mode: InputMode,
}

impl AllocationConfig {
    /// 周可分配总工时
    pub fn total_hours(&self) -> f64 {
        self.regular_hours + self.overtime_hours
    }

    /// 配置合法性检查: 工时必须为非负且总工时大于 0
    pub fn validate(&self) -> Result<(), String> {
        if self.regular_hours < 0.0 || self.overtime_hours < 0.0 {
            return Err(format!(
                "工时不能为负: regular={}, overtime={}",
                self.regular_hours, self.overtime_hours
            ));
        }
        if self.total_hours() <= 0.0 {
            return Err("周总工时必须大于 0".to_string());
        }
        Ok(())
    }

    /// 派生会话初始的周上下文
    pub fn week_context(&self) -> WeekContext {
        WeekContext {
            total_hours: self.total_hours(),
            regular_hours: self.regular_hours,
            overtime_hours: self.overtime_hours,
            input_mode: self.input_mode,
            current_week: None,
        }
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            regular_hours: 40.0,
            overtime_hours: 10.0,
            input_mode: InputMode::Percentage,
        }
    }
}
