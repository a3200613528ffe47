//! Campaign authoring: listing a new campaign and editing an existing one.

use chrono::NaiveDateTime;
use model::entities::campaign::{
    self, CampaignStatus, CommissionType, SalesMaterials, StringList, TargetDemographics,
};
use model::entities::profile::UserType;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::{debug, info, instrument, warn};

use crate::access::require_role;
use crate::error::{Result, WorkflowError};

/// Everything the authoring form collects.
#[derive(Debug, Clone)]
pub struct CampaignDraft {
    pub title: String,
    pub description: String,
    pub commission_rate: Decimal,
    pub commission_type: CommissionType,
    pub target_regions: Vec<String>,
    pub target_demographics: TargetDemographics,
    pub product_images: Vec<String>,
    pub sales_materials: SalesMaterials,
}

/// Partial edit of a campaign. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct CampaignChanges {
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

/// Percentage commissions must lie in `0..=100`, flat ones must not be negative.
pub fn validate_commission(rate: Decimal, commission_type: CommissionType) -> Result<()> {
    if rate < Decimal::ZERO {
        return Err(WorkflowError::Validation(
            "commission rate must not be negative".to_string(),
        ));
    }
    if commission_type == CommissionType::Percentage && rate > Decimal::ONE_HUNDRED {
        return Err(WorkflowError::Validation(
            "percentage commission must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(WorkflowError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

/// Inserts a new active campaign owned by `owner_id`.
///
/// The owner must have a startup profile. Region, age group and income level
/// lists are de-duplicated keeping the first occurrence.
#[instrument(skip(db, draft), fields(title = %draft.title))]
pub async fn create_campaign(
    db: &DatabaseConnection,
    owner_id: i32,
    draft: CampaignDraft,
    now: NaiveDateTime,
) -> Result<campaign::Model> {
    require_role(db, owner_id, UserType::Startup, "list campaigns").await?;
    validate_title(&draft.title)?;
    validate_commission(draft.commission_rate, draft.commission_type)?;

    let new_campaign = campaign::ActiveModel {
        owner_id: Set(owner_id),
        title: Set(draft.title.trim().to_string()),
        description: Set(draft.description),
        product_images: Set(StringList::deduplicated(draft.product_images)),
        commission_rate: Set(draft.commission_rate),
        commission_type: Set(draft.commission_type),
        target_regions: Set(StringList::deduplicated(draft.target_regions)),
        target_demographics: Set(draft.target_demographics.normalized()),
        sales_materials: Set(draft.sales_materials.normalized()),
        status: Set(CampaignStatus::Active),
        created_at: Set(now),
        ..Default::default()
    };

    let model = new_campaign.insert(db).await?;
    info!("Campaign {} '{}' listed by owner {}", model.id, model.title, owner_id);
    Ok(model)
}

/// Edits a campaign. Only its owner may do so.
#[instrument(skip(db, changes))]
pub async fn update_campaign(
    db: &DatabaseConnection,
    actor_id: i32,
    campaign_id: i32,
    changes: CampaignChanges,
) -> Result<campaign::Model> {
    let existing = campaign::Entity::find_by_id(campaign_id)
        .one(db)
        .await?
        .ok_or(WorkflowError::CampaignNotFound(campaign_id))?;

    if existing.owner_id != actor_id {
        warn!(
            "Actor {} tried to edit campaign {} owned by {}",
            actor_id, campaign_id, existing.owner_id
        );
        return Err(WorkflowError::Forbidden(
            "only the campaign owner can edit it".to_string(),
        ));
    }

    let rate = changes.commission_rate.unwrap_or(existing.commission_rate);
    let commission_type = changes.commission_type.unwrap_or(existing.commission_type);
    validate_commission(rate, commission_type)?;

    let mut active: campaign::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(title) = changes.title {
        validate_title(&title)?;
        active.title = Set(title.trim().to_string());
        updated_fields.push("title");
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
        updated_fields.push("description");
    }
    if changes.commission_rate.is_some() {
        active.commission_rate = Set(rate);
        updated_fields.push("commission_rate");
    }
    if changes.commission_type.is_some() {
        active.commission_type = Set(commission_type);
        updated_fields.push("commission_type");
    }
    if let Some(regions) = changes.target_regions {
        active.target_regions = Set(StringList::deduplicated(regions));
        updated_fields.push("target_regions");
    }
    if let Some(demographics) = changes.target_demographics {
        active.target_demographics = Set(demographics.normalized());
        updated_fields.push("target_demographics");
    }
    if let Some(images) = changes.product_images {
        active.product_images = Set(StringList::deduplicated(images));
        updated_fields.push("product_images");
    }
    if let Some(materials) = changes.sales_materials {
        active.sales_materials = Set(materials.normalized());
        updated_fields.push("sales_materials");
    }
    if let Some(status) = changes.status {
        active.status = Set(status);
        updated_fields.push("status");
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for campaign {}", campaign_id);
        return campaign::Entity::find_by_id(campaign_id)
            .one(db)
            .await?
            .ok_or(WorkflowError::CampaignNotFound(campaign_id));
    }

    let updated = active.update(db).await?;
    info!(
        "Campaign {} updated. Updated fields: {}",
        campaign_id,
        updated_fields.join(", ")
    );
    Ok(updated)
}

/// Returns a campaign as `viewer_id` may see it: active campaigns to
/// everyone, inactive ones to their owner only.
#[instrument(skip(db))]
pub async fn campaign_for_viewer(
    db: &DatabaseConnection,
    viewer_id: Option<i32>,
    campaign_id: i32,
) -> Result<campaign::Model> {
    let campaign = campaign::Entity::find_by_id(campaign_id)
        .one(db)
        .await?
        .ok_or(WorkflowError::CampaignNotFound(campaign_id))?;

    if campaign.is_active() || viewer_id == Some(campaign.owner_id) {
        Ok(campaign)
    } else {
        debug!("Campaign {} is inactive and hidden from {:?}", campaign_id, viewer_id);
        Err(WorkflowError::CampaignNotFound(campaign_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{now, seed_profile, setup_db};

    fn draft(rate: i64) -> CampaignDraft {
        CampaignDraft {
            title: "Eco Bottle".to_string(),
            description: "Reusable steel bottle".to_string(),
            commission_rate: Decimal::new(rate, 0),
            commission_type: CommissionType::Percentage,
            target_regions: vec!["Delhi".to_string(), "Goa".to_string(), "Delhi".to_string()],
            target_demographics: TargetDemographics {
                age_groups: vec!["18-25".to_string(), "18-25".to_string()],
                ..Default::default()
            },
            product_images: vec![],
            sales_materials: SalesMaterials {
                brochures: Some(String::new()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_create_campaign_forces_active_and_owner() {
        let db = setup_db().await;
        seed_profile(&db, 1, UserType::Startup).await;

        let created = create_campaign(&db, 1, draft(15), now()).await.unwrap();
        assert_eq!(created.owner_id, 1);
        assert_eq!(created.status, CampaignStatus::Active);
        assert_eq!(created.commission_rate, Decimal::new(15, 0));
        assert_eq!(created.created_at, now());
        assert_eq!(created.target_regions.0, vec!["Delhi", "Goa"]);
        assert_eq!(created.target_demographics.age_groups, vec!["18-25"]);
        assert_eq!(created.sales_materials.brochures, None);
    }

    #[tokio::test]
    async fn test_create_campaign_requires_startup_profile() {
        let db = setup_db().await;
        seed_profile(&db, 2, UserType::Seller).await;

        let result = create_campaign(&db, 2, draft(15), now()).await;
        assert!(matches!(result, Err(WorkflowError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_commission_bounds() {
        let db = setup_db().await;
        seed_profile(&db, 1, UserType::Startup).await;

        assert!(create_campaign(&db, 1, draft(0), now()).await.is_ok());
        assert!(create_campaign(&db, 1, draft(100), now()).await.is_ok());
        assert!(matches!(
            create_campaign(&db, 1, draft(101), now()).await,
            Err(WorkflowError::Validation(_))
        ));
        assert!(matches!(
            create_campaign(&db, 1, draft(-1), now()).await,
            Err(WorkflowError::Validation(_))
        ));

        // Flat commissions are amounts, not percentages
        let mut flat = draft(250);
        flat.commission_type = CommissionType::Flat;
        assert!(create_campaign(&db, 1, flat, now()).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_campaign_owner_only() {
        let db = setup_db().await;
        seed_profile(&db, 1, UserType::Startup).await;
        seed_profile(&db, 3, UserType::Startup).await;
        let created = create_campaign(&db, 1, draft(15), now()).await.unwrap();

        let changes = CampaignChanges {
            status: Some(CampaignStatus::Inactive),
            commission_rate: Some(Decimal::new(20, 0)),
            ..Default::default()
        };
        let denied = update_campaign(&db, 3, created.id, changes.clone()).await;
        assert!(matches!(denied, Err(WorkflowError::Forbidden(_))));

        let updated = update_campaign(&db, 1, created.id, changes).await.unwrap();
        assert_eq!(updated.status, CampaignStatus::Inactive);
        assert_eq!(updated.commission_rate, Decimal::new(20, 0));
        assert_eq!(updated.title, "Eco Bottle");
    }

    #[tokio::test]
    async fn test_inactive_campaign_visible_to_owner_only() {
        let db = setup_db().await;
        seed_profile(&db, 1, UserType::Startup).await;
        let created = create_campaign(&db, 1, draft(15), now()).await.unwrap();
        update_campaign(
            &db,
            1,
            created.id,
            CampaignChanges {
                status: Some(CampaignStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(campaign_for_viewer(&db, Some(1), created.id).await.is_ok());
        assert!(matches!(
            campaign_for_viewer(&db, None, created.id).await,
            Err(WorkflowError::CampaignNotFound(_))
        ));
        assert!(matches!(
            campaign_for_viewer(&db, Some(2), created.id).await,
            Err(WorkflowError::CampaignNotFound(_))
        ));
    }
}
