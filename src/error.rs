// src/error.rs

use std::fmt;

/// Global Application Error Enum.
/// Every fallible operation of the comment engine returns this type.
#[derive(Debug)]
pub enum AppError {
    // Store failure or anything unexpected
    InternalServerError(String),

    // Input failed validation (e.g., empty content)
    BadRequest(String),

    // Referenced post, comment or parent is absent
    NotFound(String),

    // Caller is not allowed to touch this comment
    Forbidden(String),

    // Comment is already deleted
    InvalidState(String),

    // Reply would go past the deepest allowed level
    DepthLimitExceeded { parent_id: i64, parent_depth: i32 },

    // Bad or missing environment configuration
    Config(String),
}

impl AppError {
    /// Whether the presentation layer should catch this and show a message,
    /// as opposed to treating it as an infrastructure failure.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::InternalServerError(_) | AppError::Config(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InternalServerError(_) => write!(f, "Internal Server Error"),
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Forbidden(msg)
            | AppError::InvalidState(msg) => write!(f, "{}", msg),
            AppError::DepthLimitExceeded {
                parent_id,
                parent_depth,
            } => write!(
                f,
                "Comments can be nested at most 5 levels (comment {} is at depth {})",
                parent_id, parent_depth
            ),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_are_not_recoverable() {
        assert!(!AppError::InternalServerError("disk".into()).is_recoverable());
        assert!(!AppError::Config("DATABASE_URL".into()).is_recoverable());
        assert!(AppError::Forbidden("no".into()).is_recoverable());
        assert!(
            AppError::DepthLimitExceeded {
                parent_id: 1,
                parent_depth: 4
            }
            .is_recoverable()
        );
    }

    #[test]
    fn internal_details_stay_out_of_the_message() {
        let err = AppError::InternalServerError("no such table: comments".into());
        assert_eq!(err.to_string(), "Internal Server Error");
    }
}
