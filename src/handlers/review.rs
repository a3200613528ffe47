//! Match & onboard: the owner's view of incoming applications.

use crate::handlers::applications::ApplicationResponse;
use crate::helpers::errors::{workflow_error, ApiError};
use crate::helpers::extract::{ApiJson, ApiPath};
use crate::helpers::identity::CurrentUser;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::State,
    response::Json,
};
use chrono::Utc;
use model::entities::campaign::{CampaignStatus, CommissionType, SalesMaterials};
use model::entities::profile;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use workflow::review::{
    self, ApplicationBoard, ApplicationDetail, CampaignApplicationStats, ReviewDecision,
};

/// Campaign fields shown on an application card
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewCampaignSummary {
    pub id: i32,
    pub title: String,
    pub commission_rate: Decimal,
    pub commission_type: CommissionType,
    pub sales_materials: SalesMaterials,
}

/// Contact details of the applying seller
#[derive(Debug, Serialize, ToSchema)]
pub struct SellerContact {
    pub id: i32,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub bio: Option<String>,
}

impl From<profile::Model> for SellerContact {
    fn from(model: profile::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            phone: model.phone,
            city: model.city,
            state: model.state,
            bio: model.bio,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewApplicationResponse {
    pub application: ApplicationResponse,
    pub campaign: ReviewCampaignSummary,
    pub seller: Option<SellerContact>,
}

impl From<ApplicationDetail> for ReviewApplicationResponse {
    fn from(detail: ApplicationDetail) -> Self {
        Self {
            application: ApplicationResponse::from(detail.application),
            campaign: ReviewCampaignSummary {
                id: detail.campaign.id,
                title: detail.campaign.title,
                commission_rate: detail.campaign.commission_rate,
                commission_type: detail.campaign.commission_type,
                sales_materials: detail.campaign.sales_materials,
            },
            seller: detail.seller.map(SellerContact::from),
        }
    }
}

/// Applications grouped for the review screen, newest first in each group
#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationBoardResponse {
    pub pending: Vec<ReviewApplicationResponse>,
    pub reviewed: Vec<ReviewApplicationResponse>,
}

impl From<ApplicationBoard> for ApplicationBoardResponse {
    fn from(board: ApplicationBoard) -> Self {
        Self {
            pending: board.pending.into_iter().map(Into::into).collect(),
            reviewed: board.reviewed.into_iter().map(Into::into).collect(),
        }
    }
}

/// Application counts of one owned campaign
#[derive(Debug, Serialize, ToSchema)]
pub struct CampaignStatsResponse {
    pub campaign_id: i32,
    pub title: String,
    pub commission_rate: Decimal,
    pub commission_type: CommissionType,
    pub status: CampaignStatus,
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
}

impl From<CampaignApplicationStats> for CampaignStatsResponse {
    fn from(stats: CampaignApplicationStats) -> Self {
        Self {
            campaign_id: stats.campaign_id,
            title: stats.title,
            commission_rate: stats.commission_rate,
            commission_type: stats.commission_type,
            status: stats.status,
            total: stats.total,
            approved: stats.approved,
            pending: stats.pending,
            rejected: stats.rejected,
        }
    }
}

/// Owner's verdict
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl From<Decision> for ReviewDecision {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approve => ReviewDecision::Approve,
            Decision::Reject => ReviewDecision::Reject,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReviewRequest {
    pub decision: Decision,
}

/// Applications to the caller's campaigns
#[utoipa::path(
    get,
    path = "/api/v1/review/applications",
    tag = "review",
    params(("X-User-Id" = i32, Header, description = "Authenticated identity")),
    responses(
        (status = 200, description = "Applications retrieved successfully", body = ApiResponse<ApplicationBoardResponse>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_review_applications(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<ApplicationBoardResponse>>, ApiError> {
    trace!("Entering get_review_applications function");

    let details = review::list_owner_applications(&state.db, user_id)
        .await
        .map_err(workflow_error)?;
    let board = ApplicationBoard::split(details);
    debug!(
        "Owner {} has {} pending and {} reviewed applications",
        user_id,
        board.pending.len(),
        board.reviewed.len()
    );

    Ok(Json(ApiResponse {
        data: ApplicationBoardResponse::from(board),
        message: "Applications retrieved successfully".to_string(),
        success: true,
    }))
}

/// Per-campaign application counts for the caller's campaigns
#[utoipa::path(
    get,
    path = "/api/v1/review/campaigns",
    tag = "review",
    params(("X-User-Id" = i32, Header, description = "Authenticated identity")),
    responses(
        (status = 200, description = "Statistics retrieved successfully", body = ApiResponse<Vec<CampaignStatsResponse>>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_campaign_stats(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<Vec<CampaignStatsResponse>>>, ApiError> {
    trace!("Entering get_campaign_stats function");

    let stats = review::campaign_application_stats(&state.db, user_id)
        .await
        .map_err(workflow_error)?;

    Ok(Json(ApiResponse {
        data: stats.into_iter().map(CampaignStatsResponse::from).collect(),
        message: "Campaign statistics retrieved successfully".to_string(),
        success: true,
    }))
}

/// Approve or reject a pending application
#[utoipa::path(
    post,
    path = "/api/v1/applications/{application_id}/review",
    tag = "review",
    request_body = ReviewRequest,
    params(
        ("application_id" = i32, Path, description = "Application ID"),
        ("X-User-Id" = i32, Header, description = "Authenticated identity"),
    ),
    responses(
        (status = 200, description = "Application reviewed", body = ApiResponse<ApplicationResponse>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Not the campaign owner", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 409, description = "Application already reviewed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn review_application(
    ApiPath(application_id): ApiPath<i32>,
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ApiJson(request): ApiJson<ReviewRequest>,
) -> Result<Json<ApiResponse<ApplicationResponse>>, ApiError> {
    trace!("Entering review_application function for application_id: {}", application_id);

    let reviewed = review::review_application(
        &state.db,
        user_id,
        application_id,
        request.decision.into(),
        Utc::now().naive_utc(),
    )
    .await
    .map_err(workflow_error)?;

    info!("Application {} is now {:?}", reviewed.id, reviewed.status);
    let message = match request.decision {
        Decision::Approve => "Application approved",
        Decision::Reject => "Application rejected",
    };
    Ok(Json(ApiResponse {
        data: ApplicationResponse::from(reviewed),
        message: message.to_string(),
        success: true,
    }))
}
