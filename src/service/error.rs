// ==========================================
// 周工时分配系统 - 服务层错误类型
// ==========================================
// 职责: 定义外部服务访问错误 (传输/状态码/解码)
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 服务层错误类型
#[derive(Error, Debug)]
pub enum ServiceError {
    // ===== 传输错误 =====
    #[error("传输失败: {0}")]
    Transport(String),

    #[error("非成功状态码: status={status}, endpoint={endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    // ===== 数据错误 =====
    #[error("响应解码失败: {0}")]
    Decode(String),

    #[error("资源未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ServiceResult<T> = Result<T, ServiceError>;
