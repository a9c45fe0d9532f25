//! Mapping of service errors onto HTTP responses

use crate::error::AscenderError;
use crate::utils::current_timestamp;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

/// Error returned by every API handler.
///
/// Wraps the `anyhow::Error` produced by the services; the status code is
/// picked by downcasting to [`AscenderError`].
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<AscenderError>() {
            Some(AscenderError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Some(AscenderError::BadRequest { .. }) => StatusCode::BAD_REQUEST,
            Some(AscenderError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            Some(AscenderError::NotImplemented { .. }) => StatusCode::NOT_IMPLEMENTED,
            Some(AscenderError::Upstream { .. }) => StatusCode::BAD_GATEWAY,
            Some(AscenderError::ConfigurationError { .. })
            | Some(AscenderError::InternalError { .. })
            | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed with {}: {:#}", status, self.0);
        } else {
            debug!("Request rejected with {}: {}", status, self.0);
        }

        let body = Json(json!({
            "message": self.0.to_string(),
            "timestamp": current_timestamp(),
        }));

        (status, body).into_response()
    }
}
