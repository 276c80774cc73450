//! Convenience result type alias for MacLock.

use crate::error::AppError;

/// A specialized `Result` type for MacLock operations.
pub type AppResult<T> = Result<T, AppError>;
