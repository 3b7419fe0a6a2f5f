// ==========================================
// 周工时分配系统 - Conversion Core 纯函数库
// ==========================================
// 职责: 周百分比与绝对小时数的双向换算与展示格式化
// 红线: 无状态、无副作用、无 I/O 操作
// 红线: 存储单位永远是百分比, 模式切换只改展示, 不改存储值
// ==========================================

use crate::domain::types::InputMode;

// ==========================================
// ConversionCore - 纯函数工具类
// ==========================================
pub struct ConversionCore;

impl ConversionCore {
    /// 百分比 → 小时数
    ///
    /// # 规则
    /// - hours = percentage / 100 * total_hours
    pub fn percentage_to_hours(percentage: f64, total_hours: f64) -> f64 {
        percentage / 100.0 * total_hours
    }

    /// 小时数 → 百分比
    ///
    /// # 规则
    /// - percentage = hours / total_hours * 100
    pub fn hours_to_percentage(hours: f64, total_hours: f64) -> f64 {
        hours / total_hours * 100.0
    }

    /// 按显示模式格式化存储值
    ///
    /// # 规则
    /// - 百分比模式: 原样回显存储的字符串
    /// - 小时模式: 换算为小时, 整数小时不带小数点, 否则保留 1 位小数
    /// - 未填 (None/空串): 返回空串
    pub fn format_display_value(
        percentage: Option<&str>,
        mode: InputMode,
        total_hours: f64,
    ) -> String {
        let stored = match percentage {
            Some(s) if !s.is_empty() => s,
            _ => return String::new(),
        };
        match mode {
            InputMode::Percentage => stored.to_string(),
            InputMode::Hours => {
                let value = stored.trim().parse::<f64>().unwrap_or(0.0);
                let hours = Self::percentage_to_hours(value, total_hours);
                if hours.fract() == 0.0 {
                    format!("{}", hours as i64)
                } else {
                    format!("{:.1}", hours)
                }
            }
        }
    }

    /// 解析小时模式下的输入, 换算为待存储的百分比字符串
    ///
    /// # 规则
    /// - 空串或 "0": 清空 (Some(None))
    /// - 负数或大于 total_hours: 静默拒绝 (None, 存储值不变, 不截断)
    /// - 其余: 换算为百分比并保留 2 位小数
    ///
    /// # 返回
    /// - None: 输入被拒绝, 不更新存储
    /// - Some(None): 清空存储值
    /// - Some(Some(p)): 存储新的百分比字符串
    pub fn parse_hours_input(value: &str, total_hours: f64) -> Option<Option<String>> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "0" {
            return Some(None);
        }
        let hours = trimmed.parse::<f64>().ok()?;
        if !(0.0..=total_hours).contains(&hours) {
            return None;
        }
        let percentage = Self::hours_to_percentage(hours, total_hours);
        Some(Some(format!("{:.2}", percentage)))
    }

    /// 解析百分比模式下的输入 (透传, 空串清空)
    pub fn parse_percentage_input(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
