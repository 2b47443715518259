use freight_errors::AppError;
use thiserror::Error;

/// 策略表构建与加载错误
///
/// 评估本身不会失败，只有解析标识、加载策略文件时才会产生这些错误。
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Invalid resource identifier: {0:?}")]
    InvalidResource(String),
    #[error("Unknown action: {0:?}")]
    UnknownAction(String),
    #[error("Unknown scope: {0:?}")]
    UnknownScope(String),
    #[error("Policy table not found: {0}")]
    TableNotFound(String),
    #[error("Failed to load policy table: {0}")]
    Load(#[from] figment::Error),
}

impl From<PolicyError> for AppError {
    fn from(error: PolicyError) -> Self {
        match error {
            PolicyError::InvalidResource(_)
            | PolicyError::UnknownAction(_)
            | PolicyError::UnknownScope(_) => AppError::Validation(error.to_string()),
            PolicyError::TableNotFound(_) | PolicyError::Load(_) => {
                AppError::Internal(error.to_string())
            }
        }
    }
}
