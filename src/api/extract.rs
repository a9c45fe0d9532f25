//! Request extractors

use crate::api::error::ApiError;
use crate::error::AscenderError;
use crate::types::UserId;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Header carrying the id of the authenticated user
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user issuing the request, read from the `X-User-ID` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub UserId);

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AscenderError::bad_request("Missing X-User-ID header"))?;

        let id = value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or_else(|| AscenderError::bad_request("Malformed X-User-ID header"))?;

        Ok(CallerId(id))
    }
}
