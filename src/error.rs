//! Error types for the Ascender services
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application. The HTTP layer downcasts to [`AscenderError`] to
//! pick a status code.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific service scenarios
#[derive(Debug, thiserror::Error)]
pub enum AscenderError {
    #[error("{resource} not found with id: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Bad request: {reason}")]
    BadRequest { reason: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Not implemented: {feature}")]
    NotImplemented { feature: String },

    #[error("Upstream service '{service}' failed: {message}")]
    Upstream { service: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

impl AscenderError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest {
            reason: reason.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }
}
