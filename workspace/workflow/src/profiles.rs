//! Profile registration and maintenance.

use chrono::NaiveDateTime;
use model::entities::profile::{self, UserType};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, WorkflowError};

/// Fields collected at signup.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub user_type: UserType,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

/// Editable profile fields. The user type is fixed at signup.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

/// Creates the profile of `identity_id`. Fails if one already exists.
#[instrument(skip(db, new_profile))]
pub async fn create_profile(
    db: &DatabaseConnection,
    identity_id: i32,
    new_profile: NewProfile,
    now: NaiveDateTime,
) -> Result<profile::Model> {
    if profile::Entity::find_by_id(identity_id).one(db).await?.is_some() {
        warn!("Profile {} already exists", identity_id);
        return Err(WorkflowError::ProfileExists(identity_id));
    }

    let active = profile::ActiveModel {
        id: Set(identity_id),
        full_name: Set(new_profile.full_name),
        email: Set(new_profile.email),
        user_type: Set(new_profile.user_type),
        company_name: Set(new_profile.company_name),
        city: Set(new_profile.city),
        state: Set(new_profile.state),
        phone: Set(new_profile.phone),
        bio: Set(new_profile.bio),
        created_at: Set(now),
    };

    match active.insert(db).await {
        Ok(model) => {
            info!("Profile {} created as {:?}", model.id, model.user_type);
            Ok(model)
        }
        Err(err) if WorkflowError::is_unique_violation(&err) => {
            warn!("Profile {} was created concurrently", identity_id);
            Err(WorkflowError::ProfileExists(identity_id))
        }
        Err(err) => Err(err.into()),
    }
}

#[instrument(skip(db))]
pub async fn get_profile(db: &DatabaseConnection, identity_id: i32) -> Result<profile::Model> {
    profile::Entity::find_by_id(identity_id)
        .one(db)
        .await?
        .ok_or(WorkflowError::ProfileNotFound(identity_id))
}

/// Applies the provided fields and leaves the others untouched.
#[instrument(skip(db, changes))]
pub async fn update_profile(
    db: &DatabaseConnection,
    identity_id: i32,
    changes: ProfileChanges,
) -> Result<profile::Model> {
    let existing = get_profile(db, identity_id).await?;
    let mut active: profile::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(full_name) = changes.full_name {
        active.full_name = Set(Some(full_name));
        updated_fields.push("full_name");
    }
    if let Some(email) = changes.email {
        active.email = Set(Some(email));
        updated_fields.push("email");
    }
    if let Some(company_name) = changes.company_name {
        active.company_name = Set(Some(company_name));
        updated_fields.push("company_name");
    }
    if let Some(city) = changes.city {
        active.city = Set(Some(city));
        updated_fields.push("city");
    }
    if let Some(state) = changes.state {
        active.state = Set(Some(state));
        updated_fields.push("state");
    }
    if let Some(phone) = changes.phone {
        active.phone = Set(Some(phone));
        updated_fields.push("phone");
    }
    if let Some(bio) = changes.bio {
        active.bio = Set(Some(bio));
        updated_fields.push("bio");
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for profile {}", identity_id);
        return get_profile(db, identity_id).await;
    }

    let updated = active.update(db).await?;
    info!(
        "Profile {} updated. Updated fields: {}",
        identity_id,
        updated_fields.join(", ")
    );
    Ok(updated)
}
