use axum::{http::StatusCode, response::Json, BoxError};
use tower::timeout::error::Elapsed;
use tracing::{error, warn};
use workflow::WorkflowError;

use crate::schemas::ErrorResponse;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            code: code.to_string(),
            success: false,
        }),
    )
}

/// Map a workflow failure onto its HTTP status and error code.
///
/// Database failures are logged at error level; everything else is an
/// expected outcome of user input.
pub fn workflow_error(err: WorkflowError) -> ApiError {
    match err {
        WorkflowError::Database(db_error) => {
            error!("Database error: {}", db_error);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Something went wrong, please try again",
            )
        }
        WorkflowError::ProfileNotFound(_) => error_response(
            StatusCode::NOT_FOUND,
            "PROFILE_NOT_FOUND",
            "Profile not found, complete signup first",
        ),
        WorkflowError::ProfileExists(_) => {
            error_response(StatusCode::CONFLICT, "PROFILE_EXISTS", err.to_string())
        }
        WorkflowError::CampaignNotFound(_) => {
            error_response(StatusCode::NOT_FOUND, "CAMPAIGN_NOT_FOUND", err.to_string())
        }
        WorkflowError::ApplicationNotFound(_) => {
            error_response(StatusCode::NOT_FOUND, "APPLICATION_NOT_FOUND", err.to_string())
        }
        WorkflowError::CampaignInactive(_) => {
            error_response(StatusCode::CONFLICT, "CAMPAIGN_INACTIVE", err.to_string())
        }
        WorkflowError::AlreadyApplied { .. } => error_response(
            StatusCode::CONFLICT,
            "ALREADY_APPLIED",
            "You have already applied to this campaign",
        ),
        WorkflowError::AlreadyReviewed { .. } => {
            error_response(StatusCode::CONFLICT, "ALREADY_REVIEWED", err.to_string())
        }
        WorkflowError::Forbidden(reason) => {
            warn!("Forbidden: {}", reason);
            error_response(StatusCode::FORBIDDEN, "FORBIDDEN", reason)
        }
        WorkflowError::Validation(reason) => {
            error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", reason)
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    error_response(StatusCode::NOT_FOUND, "NOT_FOUND", "Page not found")
}

/// Failures raised by the middleware stack rather than by a handler
pub async fn middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        warn!("Request timed out");
        return error_response(
            StatusCode::REQUEST_TIMEOUT,
            "REQUEST_TIMEOUT",
            "Request took too long, please try again",
        );
    }

    error!("Unhandled middleware error: {}", err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "Something went wrong, please try again",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_application_maps_to_conflict() {
        let (status, Json(body)) = workflow_error(WorkflowError::AlreadyApplied {
            campaign_id: 1,
            seller_id: 2,
        });
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "ALREADY_APPLIED");
        assert!(!body.success);
    }

    #[test]
    fn test_database_error_hides_details() {
        let (status, Json(body)) =
            workflow_error(WorkflowError::Database(sea_orm::DbErr::Custom("boom".into())));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "DATABASE_ERROR");
        assert!(!body.error.contains("boom"));
    }

    #[tokio::test]
    async fn test_elapsed_timeout_maps_to_request_timeout() {
        let (status, Json(body)) = middleware_error(Box::new(Elapsed::new())).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body.code, "REQUEST_TIMEOUT");
        assert!(!body.success);
    }
}
