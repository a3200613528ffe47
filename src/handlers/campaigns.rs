use crate::helpers::errors::{workflow_error, ApiError};
use crate::helpers::extract::{ApiPath, ValidJson, ValidQuery};
use crate::helpers::identity::CurrentUser;
use crate::schemas::{ApiResponse, AppState, CachedData, CATALOG_CACHE_KEY};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDateTime, Utc};
use model::entities::campaign::{
    self, CampaignStatus, CommissionType, SalesMaterials, TargetDemographics,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;
use workflow::authoring::{self, CampaignChanges, CampaignDraft};
use workflow::catalog::{self, available_regions, CampaignListing, CatalogFilter};

/// Catalog search parameters
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct CatalogQuery {
    /// Case-insensitive text matched against title and description
    #[validate(length(max = 200))]
    pub search: Option<String>,
    /// Only campaigns targeting this region
    #[validate(length(max = 100))]
    pub region: Option<String>,
}

/// Request body for listing a new campaign
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Percentage (0-100) or flat amount, depending on `commission_type`
    pub commission_rate: Decimal,
    pub commission_type: CommissionType,
    #[serde(default)]
    pub target_regions: Vec<String>,
    #[serde(default)]
    pub target_demographics: TargetDemographics,
    /// Image URLs
    #[serde(default)]
    pub product_images: Vec<String>,
    #[serde(default)]
    pub sales_materials: SalesMaterials,
}

/// Request body for editing a campaign. Omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub commission_rate: Option<Decimal>,
    pub commission_type: Option<CommissionType>,
    pub target_regions: Option<Vec<String>>,
    pub target_demographics: Option<TargetDemographics>,
    pub product_images: Option<Vec<String>>,
    pub sales_materials: Option<SalesMaterials>,
    pub status: Option<CampaignStatus>,
}

/// Campaign response model
#[derive(Debug, Serialize, ToSchema)]
pub struct CampaignResponse {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub product_images: Vec<String>,
    pub commission_rate: Decimal,
    pub commission_type: CommissionType,
    pub target_regions: Vec<String>,
    pub target_demographics: TargetDemographics,
    pub sales_materials: SalesMaterials,
    pub status: CampaignStatus,
    pub created_at: NaiveDateTime,
}

impl From<campaign::Model> for CampaignResponse {
    fn from(model: campaign::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            title: model.title,
            description: model.description,
            product_images: model.product_images.0,
            commission_rate: model.commission_rate,
            commission_type: model.commission_type,
            target_regions: model.target_regions.0,
            target_demographics: model.target_demographics,
            sales_materials: model.sales_materials,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

/// A catalog card: the campaign plus who listed it
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogEntryResponse {
    #[serde(flatten)]
    pub campaign: CampaignResponse,
    pub owner_full_name: Option<String>,
    pub owner_company_name: Option<String>,
}

impl From<CampaignListing> for CatalogEntryResponse {
    fn from(listing: CampaignListing) -> Self {
        Self {
            campaign: CampaignResponse::from(listing.campaign),
            owner_full_name: listing.owner_full_name,
            owner_company_name: listing.owner_company_name,
        }
    }
}

/// Filtered campaigns and the regions available for filtering
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub campaigns: Vec<CatalogEntryResponse>,
    /// Sorted union of the regions of all active campaigns
    pub regions: Vec<String>,
}

/// Active campaigns, served from the cache until a campaign changes.
async fn active_listings(state: &AppState) -> workflow::Result<Arc<Vec<CampaignListing>>> {
    let generation = state.catalog_generation();
    match state.cache.get(CATALOG_CACHE_KEY).await {
        Some(CachedData::Catalog {
            generation: cached,
            listings,
        }) if cached == generation => {
            trace!("Catalog served from cache");
            return Ok(listings);
        }
        Some(_) => debug!("Discarding catalog snapshot from an older generation"),
        None => {}
    }

    let listings = Arc::new(catalog::load_active_campaigns(&state.db).await?);
    state
        .cache
        .insert(
            CATALOG_CACHE_KEY.to_string(),
            CachedData::Catalog {
                generation,
                listings: listings.clone(),
            },
        )
        .await;
    Ok(listings)
}

/// Browse active campaigns
#[utoipa::path(
    get,
    path = "/api/v1/campaigns",
    tag = "campaigns",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Catalog retrieved successfully", body = ApiResponse<CatalogResponse>),
        (status = 400, description = "Invalid query"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_campaigns(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<CatalogQuery>,
) -> Result<Json<ApiResponse<CatalogResponse>>, ApiError> {
    trace!("Entering list_campaigns function");

    let listings = active_listings(&state).await.map_err(workflow_error)?;
    let filter = CatalogFilter {
        search: query.search,
        region: query.region,
    };

    let campaigns: Vec<CatalogEntryResponse> = filter
        .apply(listings.iter())
        .into_iter()
        .map(CatalogEntryResponse::from)
        .collect();
    let regions = available_regions(listings.iter());

    debug!(
        "Catalog: {} of {} active campaigns match, {} regions",
        campaigns.len(),
        listings.len(),
        regions.len()
    );

    Ok(Json(ApiResponse {
        data: CatalogResponse { campaigns, regions },
        message: "Campaigns retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get one campaign. Inactive campaigns are visible to their owner only.
#[utoipa::path(
    get,
    path = "/api/v1/campaigns/{campaign_id}",
    tag = "campaigns",
    params(
        ("campaign_id" = i32, Path, description = "Campaign ID"),
    ),
    responses(
        (status = 200, description = "Campaign retrieved successfully", body = ApiResponse<CampaignResponse>),
        (status = 404, description = "Campaign not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_campaign(
    ApiPath(campaign_id): ApiPath<i32>,
    State(state): State<AppState>,
    viewer: Option<CurrentUser>,
) -> Result<Json<ApiResponse<CampaignResponse>>, ApiError> {
    trace!("Entering get_campaign function for campaign_id: {}", campaign_id);

    let campaign = authoring::campaign_for_viewer(&state.db, viewer.map(|v| v.0), campaign_id)
        .await
        .map_err(workflow_error)?;

    Ok(Json(ApiResponse {
        data: CampaignResponse::from(campaign),
        message: "Campaign retrieved successfully".to_string(),
        success: true,
    }))
}

/// List a new campaign
#[utoipa::path(
    post,
    path = "/api/v1/campaigns",
    tag = "campaigns",
    request_body = CreateCampaignRequest,
    params(("X-User-Id" = i32, Header, description = "Authenticated identity")),
    responses(
        (status = 201, description = "Campaign created successfully", body = ApiResponse<CampaignResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Only startups can list campaigns", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(title = %request.title))]
pub async fn create_campaign(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ValidJson(request): ValidJson<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CampaignResponse>>), ApiError> {
    trace!("Entering create_campaign function");
    debug!(
        "Creating campaign for owner {} with commission {} ({:?})",
        user_id, request.commission_rate, request.commission_type
    );

    let draft = CampaignDraft {
        title: request.title,
        description: request.description,
        commission_rate: request.commission_rate,
        commission_type: request.commission_type,
        target_regions: request.target_regions,
        target_demographics: request.target_demographics,
        product_images: request.product_images,
        sales_materials: request.sales_materials,
    };

    let created = authoring::create_campaign(&state.db, user_id, draft, Utc::now().naive_utc())
        .await
        .map_err(workflow_error)?;
    state.invalidate_catalog().await;

    info!("Campaign {} created by {}", created.id, user_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CampaignResponse::from(created),
            message: "Campaign created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Edit a campaign owned by the caller
#[utoipa::path(
    put,
    path = "/api/v1/campaigns/{campaign_id}",
    tag = "campaigns",
    request_body = UpdateCampaignRequest,
    params(
        ("campaign_id" = i32, Path, description = "Campaign ID"),
        ("X-User-Id" = i32, Header, description = "Authenticated identity"),
    ),
    responses(
        (status = 200, description = "Campaign updated successfully", body = ApiResponse<CampaignResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Not the campaign owner", body = ErrorResponse),
        (status = 404, description = "Campaign not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_campaign(
    ApiPath(campaign_id): ApiPath<i32>,
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ValidJson(request): ValidJson<UpdateCampaignRequest>,
) -> Result<Json<ApiResponse<CampaignResponse>>, ApiError> {
    trace!("Entering update_campaign function for campaign_id: {}", campaign_id);

    let changes = CampaignChanges {
        title: request.title,
        description: request.description,
        commission_rate: request.commission_rate,
        commission_type: request.commission_type,
        target_regions: request.target_regions,
        target_demographics: request.target_demographics,
        product_images: request.product_images,
        sales_materials: request.sales_materials,
        status: request.status,
    };

    let updated = authoring::update_campaign(&state.db, user_id, campaign_id, changes)
        .await
        .map_err(workflow_error)?;
    state.invalidate_catalog().await;

    info!("Campaign {} updated by {}", campaign_id, user_id);
    Ok(Json(ApiResponse {
        data: CampaignResponse::from(updated),
        message: "Campaign updated successfully".to_string(),
        success: true,
    }))
}
