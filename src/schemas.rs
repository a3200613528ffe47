use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use utoipa::{OpenApi, ToSchema};
use workflow::catalog::CampaignListing;

use crate::handlers::{
    applications::{ApplicationResponse, ApplyRequest, SubmissionResponse},
    campaigns::{
        CampaignResponse, CatalogEntryResponse, CatalogQuery, CatalogResponse,
        CreateCampaignRequest, UpdateCampaignRequest,
    },
    dashboard::{ActivityResponse, DashboardResponse, DashboardSummaryResponse},
    profiles::{CreateProfileRequest, ProfileResponse, UpdateProfileRequest},
    review::{
        ApplicationBoardResponse, CampaignStatsResponse, Decision, ReviewApplicationResponse,
        ReviewCampaignSummary, ReviewRequest, SellerContact,
    },
};
use model::entities::{
    campaign::{CampaignStatus, CommissionType, SalesMaterials, TargetDemographics},
    profile::UserType,
    seller_application::ApplicationStatus,
};

/// Cache key of the active catalog snapshot
pub const CATALOG_CACHE_KEY: &str = "catalog:active";

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for read-heavy queries
    pub cache: Cache<String, CachedData>,
    /// Upper bound for a single request
    pub request_timeout: Duration,
    /// Bumped after every write that changes what the catalog shows
    catalog_generation: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        cache: Cache<String, CachedData>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            db,
            cache,
            request_timeout,
            catalog_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn catalog_generation(&self) -> u64 {
        self.catalog_generation.load(Ordering::Acquire)
    }

    /// Drop the catalog snapshot. Call after the write has committed.
    ///
    /// Snapshots loaded before the bump carry the old generation and are
    /// ignored on read, even if they reach the cache after this call.
    pub async fn invalidate_catalog(&self) {
        self.catalog_generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate(CATALOG_CACHE_KEY).await;
    }
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    /// Active listings, tagged with the catalog generation read before loading
    Catalog {
        generation: u64,
        listings: Arc<Vec<CampaignListing>>,
    },
}

/// API response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(
    CatalogApiResponse = ApiResponse<CatalogResponse>,
    CampaignApiResponse = ApiResponse<CampaignResponse>,
    SubmissionApiResponse = ApiResponse<SubmissionResponse>,
    ApplicationApiResponse = ApiResponse<ApplicationResponse>,
    ApplicationBoardApiResponse = ApiResponse<ApplicationBoardResponse>,
    CampaignStatsApiResponse = ApiResponse<Vec<CampaignStatsResponse>>,
    ProfileApiResponse = ApiResponse<ProfileResponse>,
    DashboardApiResponse = ApiResponse<DashboardResponse>,
)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::campaigns::list_campaigns,
        crate::handlers::campaigns::get_campaign,
        crate::handlers::campaigns::create_campaign,
        crate::handlers::campaigns::update_campaign,
        crate::handlers::applications::apply_to_campaign,
        crate::handlers::applications::submit_application,
        crate::handlers::review::get_review_applications,
        crate::handlers::review::get_campaign_stats,
        crate::handlers::review::review_application,
        crate::handlers::profiles::create_profile,
        crate::handlers::profiles::get_my_profile,
        crate::handlers::profiles::update_my_profile,
        crate::handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            CatalogApiResponse,
            CampaignApiResponse,
            SubmissionApiResponse,
            ApplicationApiResponse,
            ApplicationBoardApiResponse,
            CampaignStatsApiResponse,
            ProfileApiResponse,
            DashboardApiResponse,
            ErrorResponse,
            HealthResponse,
            CatalogQuery,
            CatalogResponse,
            CatalogEntryResponse,
            CampaignResponse,
            CreateCampaignRequest,
            UpdateCampaignRequest,
            ApplyRequest,
            ApplicationResponse,
            SubmissionResponse,
            ReviewRequest,
            Decision,
            ApplicationBoardResponse,
            ReviewApplicationResponse,
            ReviewCampaignSummary,
            SellerContact,
            CampaignStatsResponse,
            CreateProfileRequest,
            UpdateProfileRequest,
            ProfileResponse,
            DashboardResponse,
            DashboardSummaryResponse,
            ActivityResponse,
            CampaignStatus,
            CommissionType,
            TargetDemographics,
            SalesMaterials,
            UserType,
            ApplicationStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "campaigns", description = "Campaign catalog and authoring"),
        (name = "applications", description = "Seller applications"),
        (name = "review", description = "Reviewing applications to owned campaigns"),
        (name = "profiles", description = "Signup and profile maintenance"),
        (name = "dashboard", description = "Role-specific dashboard"),
    ),
    info(
        title = "Bazaar API",
        description = "Marketplace connecting startups with independent sellers",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
