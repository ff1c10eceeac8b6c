use thiserror::Error;
use uuid::Uuid;

use crate::models::ValidationType;

/// 分配系统错误类型定义
///
/// 分配引擎本身是全函数，不会返回错误；这些错误由请求校验、服务层和协作方实现产生。
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("标注人员列表为空")]
    EmptyAnnotatorPool,

    #[error("校验类型 {validation_type} 没有可用的校验人员")]
    EmptyValidatorPool { validation_type: ValidationType },

    #[error("无效的覆盖次数: {coverage} - {message}")]
    InvalidExtensiveCoverage { coverage: u32, message: String },

    #[error("无效的文件 {file_id}: {message}")]
    InvalidFile { file_id: i64, message: String },

    #[error("文件 {file_id} 有 {pages} 页无法达到要求的标注覆盖次数")]
    AnnotationCoverageGap { file_id: i64, pages: usize },

    #[error("文件 {file_id} 有 {pages} 页无法分配给任何校验人员")]
    ValidationCoverageGap { file_id: i64, pages: usize },

    #[error("用户未找到: {id}")]
    UserNotFound { id: Uuid },

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("任务持久化错误: {0}")]
    Persistence(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 统一的Result类型
pub type AllocationResult<T> = std::result::Result<T, AllocationError>;
