//! The acting identity. Sessions are issued elsewhere; by the time a request
//! reaches us the identity id travels in the `X-User-Id` header.

use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode};
use tracing::debug;

use super::errors::{error_response, ApiError};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated actor. Rejects with 401 `UNAUTHENTICATED` when the header
/// is missing or not an integer; use `Option<CurrentUser>` for routes that
/// also serve anonymous visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i32);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok());

        match user_id {
            Some(id) => Ok(CurrentUser(id)),
            None => {
                debug!("Request without a usable {} header", USER_ID_HEADER);
                Err(error_response(
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHENTICATED",
                    "Sign in required",
                ))
            }
        }
    }
}
