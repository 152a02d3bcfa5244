//! Unified Result Types

use crate::utils::AppError;

/// Application-level Result type
///
/// Used by the service layer and everything above it
pub type AppResult<T> = Result<T, AppError>;
