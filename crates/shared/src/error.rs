//! Errors surfaced to API clients.

use thiserror::Error;

/// An error with a stable code and HTTP status, rendered as a JSON body by
/// the API layer. Billing-bound violations carry their own error type in
/// the core crate; this enum covers everything around them.
#[derive(Debug, Error)]
pub enum AppError {
    /// The referenced resource does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The request payload failed validation.
    #[error("{0}")]
    Validation(String),

    /// The request conflicts with existing data, e.g. a duplicate
    /// invoice number.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure; details stay in the server log.
    #[error("An internal error occurred")]
    Internal,
}

impl AppError {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Internal => 500,
        }
    }

    /// Stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Internal.status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(AppError::Internal.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            AppError::NotFound("invoice 42".into()).to_string(),
            "invoice 42 not found"
        );
        assert_eq!(
            AppError::Conflict("invoice number already exists: INV-1".into()).to_string(),
            "invoice number already exists: INV-1"
        );
        assert_eq!(AppError::Internal.to_string(), "An internal error occurred");
    }
}
