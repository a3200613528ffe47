use crate::helpers::errors::{workflow_error, ApiError};
use crate::helpers::extract::ValidJson;
use crate::helpers::identity::CurrentUser;
use crate::schemas::{ApiResponse, AppState};
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{NaiveDateTime, Utc};
use model::entities::profile::{self, UserType};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;
use workflow::profiles::{self, NewProfile, ProfileChanges};

/// Request body for signup
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(max = 200))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub user_type: UserType,
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
}

/// Request body for editing one's profile. The user type cannot change.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 200))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
}

/// Profile response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub user_type: UserType,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<profile::Model> for ProfileResponse {
    fn from(model: profile::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            user_type: model.user_type,
            company_name: model.company_name,
            city: model.city,
            state: model.state,
            phone: model.phone,
            bio: model.bio,
            created_at: model.created_at,
        }
    }
}

/// Complete signup by creating the caller's profile
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    tag = "profiles",
    request_body = CreateProfileRequest,
    params(("X-User-Id" = i32, Header, description = "Authenticated identity")),
    responses(
        (status = 201, description = "Profile created successfully", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 409, description = "Profile already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ValidJson(request): ValidJson<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProfileResponse>>), ApiError> {
    trace!("Entering create_profile function");
    debug!("Creating {:?} profile for identity {}", request.user_type, user_id);

    let new_profile = NewProfile {
        full_name: request.full_name,
        email: request.email,
        user_type: request.user_type,
        company_name: request.company_name,
        city: request.city,
        state: request.state,
        phone: request.phone,
        bio: request.bio,
    };

    let created = profiles::create_profile(&state.db, user_id, new_profile, Utc::now().naive_utc())
        .await
        .map_err(workflow_error)?;

    info!("Profile {} created", created.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ProfileResponse::from(created),
            message: "Profile created successfully".to_string(),
            success: true,
        }),
    ))
}

/// The caller's own profile
#[utoipa::path(
    get,
    path = "/api/v1/profiles/me",
    tag = "profiles",
    params(("X-User-Id" = i32, Header, description = "Authenticated identity")),
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ProfileResponse>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_my_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    trace!("Entering get_my_profile function");

    let profile = profiles::get_profile(&state.db, user_id)
        .await
        .map_err(workflow_error)?;

    Ok(Json(ApiResponse {
        data: ProfileResponse::from(profile),
        message: "Profile retrieved successfully".to_string(),
        success: true,
    }))
}

/// Edit the caller's own profile
#[utoipa::path(
    put,
    path = "/api/v1/profiles/me",
    tag = "profiles",
    request_body = UpdateProfileRequest,
    params(("X-User-Id" = i32, Header, description = "Authenticated identity")),
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_my_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ValidJson(request): ValidJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    trace!("Entering update_my_profile function");

    let changes = ProfileChanges {
        full_name: request.full_name,
        email: request.email,
        company_name: request.company_name,
        city: request.city,
        state: request.state,
        phone: request.phone,
        bio: request.bio,
    };

    let updated = profiles::update_profile(&state.db, user_id, changes)
        .await
        .map_err(workflow_error)?;
    // Catalog cards carry the owner's name and company
    state.invalidate_catalog().await;

    Ok(Json(ApiResponse {
        data: ProfileResponse::from(updated),
        message: "Profile updated successfully".to_string(),
        success: true,
    }))
}
