//! Request extractors whose rejections use the `ErrorResponse` envelope.
//!
//! Axum's own rejections answer in plain text. These wrappers run the same
//! extractors and turn every failure into a 400 `VALIDATION_ERROR`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::{request::Parts, StatusCode},
    response::Json,
};
use axum_valid::{Valid, ValidationRejection};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::{Validate, ValidationErrors};

use super::errors::{error_response, ApiError};

/// JSON body, validated with `validator`
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

/// Query string, validated with `validator`
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

/// JSON body without field validation
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

fn invalid_input(message: String) -> ApiError {
    debug!("Rejected request input: {}", message);
    error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    invalid_input(rejection.body_text())
}

fn validation_rejection<E>(
    rejection: ValidationRejection<ValidationErrors, E>,
    inner: impl FnOnce(E) -> ApiError,
) -> ApiError {
    match rejection {
        ValidationRejection::Valid(errors) => invalid_input(errors.to_string()),
        ValidationRejection::Inner(inner_rejection) => inner(inner_rejection),
    }
}

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Valid(Json(value)) = Valid::<Json<T>>::from_request(req, state)
            .await
            .map_err(|rejection| validation_rejection(rejection, json_rejection))?;
        Ok(Self(value))
    }
}

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Valid(Query(value)) = Valid::<Query<T>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                validation_rejection(rejection, |inner: QueryRejection| {
                    invalid_input(inner.body_text())
                })
            })?;
        Ok(Self(value))
    }
}

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        Ok(Self(value))
    }
}

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| invalid_input(rejection.body_text()))?;
        Ok(Self(value))
    }
}
