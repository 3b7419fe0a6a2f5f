// ==========================================
// 周工时分配系统 - 核心库
// ==========================================
// 技术栈: Rust + Tokio
// 系统定位: 工时填报表单的编辑与校验核心 (传输与渲染由宿主应用承担)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 服务层 - 外部服务接口
pub mod service;

// 配置层 - 周工时口径
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 编辑会话门面
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================
pub use api::{AllocationApi, ApiError, ApiResult};
pub use config::AllocationConfig;
pub use domain::{AllocationLine, AllocationSet, LineField, LineId, WeekContext};

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
