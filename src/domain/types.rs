// ==========================================
// 周工时分配系统 - 领域类型定义
// ==========================================
// 职责: 定义分配行、显示模式、提交状态等基础类型
// 序列化格式: 与外部服务的小写线上格式一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 分配行类型 (Line Kind)
// ==========================================
// job: 施工项目工时 (job + phase)
// mechanic: 机修工时 (equipment + cost code)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    #[default]
    Job,
    Mechanic,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Job => write!(f, "job"),
            LineKind::Mechanic => write!(f, "mechanic"),
        }
    }
}

// ==========================================
// 工作地点 (Work Location)
// ==========================================
// 仅当所选项目为外州项目时有意义
// Unset 在线上格式中序列化为空字符串
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkLocation {
    #[serde(rename = "onsite")]
    Onsite,
    #[serde(rename = "remote")]
    Remote,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl fmt::Display for WorkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkLocation::Onsite => write!(f, "onsite"),
            WorkLocation::Remote => write!(f, "remote"),
            WorkLocation::Unset => write!(f, ""),
        }
    }
}

// ==========================================
// 输入显示模式 (Input Mode)
// ==========================================
// 存储单位永远是百分比; 模式只影响展示与解析
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Percentage,
    Hours,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Percentage => write!(f, "percentage"),
            InputMode::Hours => write!(f, "hours"),
        }
    }
}

// ==========================================
// 分配单状态 (Allocation Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationStatus {
    Draft,
    Submitted,
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationStatus::Draft => write!(f, "draft"),
            AllocationStatus::Submitted => write!(f, "submitted"),
        }
    }
}

// ==========================================
// 提交协调器状态 (Post State)
// ==========================================
// Saving 与 Submitting 互斥, 同一时刻最多一个在途请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostState {
    Idle,
    Saving,
    Submitting,
}

impl PostState {
    pub fn is_idle(&self) -> bool {
        matches!(self, PostState::Idle)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PostState::Idle => "Idle",
            PostState::Saving => "Saving",
            PostState::Submitting => "Submitting",
        }
    }
}

// ==========================================
// 用户可见消息 (Notice)
// ==========================================
// 单槽位: 新消息覆盖旧消息, 可显式清除
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_location_wire_format() {
        assert_eq!(
            serde_json::to_string(&WorkLocation::Onsite).unwrap(),
            "\"onsite\""
        );
        assert_eq!(serde_json::to_string(&WorkLocation::Unset).unwrap(), "\"\"");
        let loc: WorkLocation = serde_json::from_str("\"\"").unwrap();
        assert_eq!(loc, WorkLocation::Unset);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&AllocationStatus::Submitted).unwrap(),
            "\"submitted\""
        );
        assert_eq!(AllocationStatus::Draft.to_string(), "draft");
    }

    #[test]
    fn test_post_state_gate() {
        assert!(PostState::Idle.is_idle());
        assert!(!PostState::Saving.is_idle());
        assert!(!PostState::Submitting.is_idle());
    }
}
