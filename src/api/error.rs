// ==========================================
// 周工时分配系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型, 转换服务层错误为业务错误
// 红线: 所有拒绝必须带显式原因 (可解释性)
// ==========================================

use crate::service::error::ServiceError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    /// 提交校验失败 (总和不等于 100)
    #[error("校验失败: {0}")]
    ValidationFailed(String),

    /// 批量操作失败 (无可补满行 / 无匹配项目号等)
    #[error("批量操作失败: {0}")]
    BulkOperationFailed(String),

    /// 分配行未找到
    #[error("分配行未找到: id={0}")]
    LineNotFound(u32),

    /// 上报被服务端拒绝 (success=false 响应)
    #[error("上报被拒绝: {0}")]
    PostRejected(String),

    // ===== 并发控制错误 =====
    /// 已有保存/提交请求在途
    #[error("已有在途请求: 当前状态={0}")]
    OperationInFlight(String),

    // ===== 外部服务错误 =====
    #[error("服务调用失败: {0}")]
    Service(#[from] ServiceError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_conversion() {
        let svc = ServiceError::Transport("connection refused".to_string());
        let api: ApiError = svc.into();
        match api {
            ApiError::Service(inner) => {
                assert!(inner.to_string().contains("connection refused"));
            }
            _ => panic!("Expected Service"),
        }
    }

    #[test]
    fn test_line_not_found_message() {
        let err = ApiError::LineNotFound(7);
        assert!(err.to_string().contains("id=7"));
    }
}
