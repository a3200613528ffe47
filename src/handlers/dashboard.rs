use crate::handlers::profiles::ProfileResponse;
use crate::helpers::errors::{workflow_error, ApiError};
use crate::helpers::identity::CurrentUser;
use crate::schemas::{ApiResponse, AppState};
use axum::{extract::State, response::Json};
use chrono::NaiveDateTime;
use model::entities::seller_application::ApplicationStatus;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{instrument, trace};
use utoipa::ToSchema;
use workflow::dashboard::{self, ActivityEntry, DashboardSummary};

/// Figures shown on the dashboard, depending on the caller's role
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum DashboardSummaryResponse {
    Startup {
        active_campaigns: usize,
        partner_sellers: usize,
        pending_applications: usize,
        regions_covered: usize,
    },
    Seller {
        applications_submitted: usize,
        approved: usize,
        pending: usize,
        /// Mean commission over approved percentage campaigns
        average_commission: Option<Decimal>,
    },
}

impl From<DashboardSummary> for DashboardSummaryResponse {
    fn from(summary: DashboardSummary) -> Self {
        match summary {
            DashboardSummary::Startup(s) => Self::Startup {
                active_campaigns: s.active_campaigns,
                partner_sellers: s.partner_sellers,
                pending_applications: s.pending_applications,
                regions_covered: s.regions_covered,
            },
            DashboardSummary::Seller(s) => Self::Seller {
                applications_submitted: s.applications_submitted,
                approved: s.approved,
                pending: s.pending,
                average_commission: s.average_commission,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityResponse {
    pub application_id: i32,
    pub campaign_id: i32,
    pub campaign_title: String,
    pub seller_id: i32,
    pub status: ApplicationStatus,
    pub occurred_at: NaiveDateTime,
}

impl From<ActivityEntry> for ActivityResponse {
    fn from(entry: ActivityEntry) -> Self {
        Self {
            application_id: entry.application_id,
            campaign_id: entry.campaign_id,
            campaign_title: entry.campaign_title,
            seller_id: entry.seller_id,
            status: entry.status,
            occurred_at: entry.occurred_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub profile: ProfileResponse,
    pub summary: DashboardSummaryResponse,
    pub recent_activity: Vec<ActivityResponse>,
}

/// The caller's dashboard
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    params(("X-User-Id" = i32, Header, description = "Authenticated identity")),
    responses(
        (status = 200, description = "Dashboard retrieved successfully", body = ApiResponse<DashboardResponse>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    trace!("Entering get_dashboard function");

    let dashboard = dashboard::load_dashboard(&state.db, user_id)
        .await
        .map_err(workflow_error)?;

    Ok(Json(ApiResponse {
        data: DashboardResponse {
            profile: ProfileResponse::from(dashboard.profile),
            summary: dashboard.summary.into(),
            recent_activity: dashboard
                .recent_activity
                .into_iter()
                .map(ActivityResponse::from)
                .collect(),
        },
        message: "Dashboard retrieved successfully".to_string(),
        success: true,
    }))
}
