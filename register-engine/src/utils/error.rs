//! 统一错误处理
//!
//! Application-level error taxonomy for the cash register engine.
//!
//! | 分类 | 说明 |
//! |------|------|
//! | Unauthorized | 操作员无此餐厅权限, never retried |
//! | Conflict | duplicate open / double check-in (invariant violation by caller) |
//! | NotFound | register/check-in missing or not in the expected state |
//! | Validation | malformed input, rejected before any store mutation |
//! | Database | transaction could not commit; the only retry-eligible kind |

use crate::db::repository::RepoError;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Operator lacks access to the restaurant
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced resource does not exist or is not in the expected state
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Caller attempted to violate an invariant (duplicate open/check-in)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input, rejected before any store mutation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Store-level failure; the operation did not happen (full rollback)
    #[error("Database error: {0}")]
    Database(String),

    /// Unexpected internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Only infra-level failures are eligible for caller-side retry;
    /// business-rule errors would fail again deterministically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Database(_))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(target: "database", error = %msg, "Database error occurred");
                AppError::Database(msg)
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::from(RepoError::from(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("Serialization error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_database_errors_are_retryable() {
        assert!(AppError::database("commit failed").is_retryable());
        assert!(!AppError::conflict("duplicate open").is_retryable());
        assert!(!AppError::validation("negative amount").is_retryable());
        assert!(!AppError::unauthorized("no access").is_retryable());
    }

    #[test]
    fn repo_duplicates_surface_as_conflict() {
        let err = AppError::from(RepoError::Duplicate("unique index".into()));
        assert!(matches!(err, AppError::Conflict(_)));
        let err = AppError::from(RepoError::NotFound("register 1".into()));
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
