use crate::helpers::errors::{workflow_error, ApiError};
use crate::helpers::extract::{ApiPath, ValidJson};
use crate::helpers::identity::CurrentUser;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDateTime, Utc};
use model::entities::seller_application::{self, ApplicationStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;
use workflow::submission::{self, ApplicationEntry};

/// Where the client goes after a successful submission
pub const AFTER_SUBMISSION_PATH: &str = "/dashboard";

/// Request body for the messaged application form
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ApplyRequest {
    pub campaign_id: i32,
    /// Pitch to the campaign owner
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub message: String,
}

/// Seller application response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationResponse {
    pub id: i32,
    pub campaign_id: i32,
    pub seller_id: i32,
    pub application_message: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: NaiveDateTime,
    pub reviewed_at: Option<NaiveDateTime>,
}

impl From<seller_application::Model> for ApplicationResponse {
    fn from(model: seller_application::Model) -> Self {
        Self {
            id: model.id,
            campaign_id: model.campaign_id,
            seller_id: model.seller_id,
            application_message: model.application_message,
            status: model.status,
            applied_at: model.applied_at,
            reviewed_at: model.reviewed_at,
        }
    }
}

/// A submitted application and the page to show next
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    pub application: ApplicationResponse,
    pub next: String,
}

async fn submit(
    state: &AppState,
    seller_id: i32,
    campaign_id: i32,
    entry: ApplicationEntry,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponse>>), ApiError> {
    let application = submission::submit_application(
        &state.db,
        seller_id,
        campaign_id,
        entry,
        Utc::now().naive_utc(),
    )
    .await
    .map_err(workflow_error)?;

    info!(
        "Seller {} applied to campaign {} (application {})",
        seller_id, campaign_id, application.id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: SubmissionResponse {
                application: ApplicationResponse::from(application),
                next: AFTER_SUBMISSION_PATH.to_string(),
            },
            message: "Application submitted successfully".to_string(),
            success: true,
        }),
    ))
}

/// Apply to a campaign straight from the catalog
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/{campaign_id}/apply",
    tag = "applications",
    params(
        ("campaign_id" = i32, Path, description = "Campaign ID"),
        ("X-User-Id" = i32, Header, description = "Authenticated identity"),
    ),
    responses(
        (status = 201, description = "Application submitted", body = ApiResponse<SubmissionResponse>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Only sellers can apply", body = ErrorResponse),
        (status = 404, description = "Campaign not found", body = ErrorResponse),
        (status = 409, description = "Already applied or campaign inactive", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn apply_to_campaign(
    ApiPath(campaign_id): ApiPath<i32>,
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponse>>), ApiError> {
    trace!("Entering apply_to_campaign function for campaign_id: {}", campaign_id);
    submit(&state, user_id, campaign_id, ApplicationEntry::OneClick).await
}

/// Apply to a campaign with a message
#[utoipa::path(
    post,
    path = "/api/v1/applications",
    tag = "applications",
    request_body = ApplyRequest,
    params(("X-User-Id" = i32, Header, description = "Authenticated identity")),
    responses(
        (status = 201, description = "Application submitted", body = ApiResponse<SubmissionResponse>),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Only sellers can apply", body = ErrorResponse),
        (status = 404, description = "Campaign not found", body = ErrorResponse),
        (status = 409, description = "Already applied or campaign inactive", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn submit_application(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ValidJson(request): ValidJson<ApplyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponse>>), ApiError> {
    trace!("Entering submit_application function");
    debug!(
        "Seller {} applying to campaign {} with a {} character message",
        user_id,
        request.campaign_id,
        request.message.len()
    );

    let entry = ApplicationEntry::Messaged {
        message: request.message,
    };
    submit(&state, user_id, request.campaign_id, entry).await
}
