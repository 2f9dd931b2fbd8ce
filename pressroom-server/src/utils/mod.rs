//! Shared server utilities: errors, logging, validation.

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResponse, ok, ok_with_message};

/// Result alias used by all API handlers
pub type AppResult<T> = Result<T, AppError>;
