//! Application submission. Sellers join a campaign either with one click or
//! through the messaged form; both end in a pending application.

use chrono::NaiveDateTime;
use model::entities::campaign;
use model::entities::profile::UserType;
use model::entities::seller_application::{self, ApplicationStatus};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, instrument, warn};

use crate::access::require_role;
use crate::error::{Result, WorkflowError};

/// The two ways a seller can apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationEntry {
    /// Catalog button: no message, no pre-check.
    OneClick,
    /// Find-campaigns form: looks for an earlier application first.
    Messaged { message: String },
}

/// Creates a pending application of `seller_id` to `campaign_id`.
///
/// The unique index on (campaign, seller) is the source of truth for
/// duplicates; the messaged entry also checks up front so the common case
/// never reaches the insert.
#[instrument(skip(db, entry))]
pub async fn submit_application(
    db: &DatabaseConnection,
    seller_id: i32,
    campaign_id: i32,
    entry: ApplicationEntry,
    now: NaiveDateTime,
) -> Result<seller_application::Model> {
    require_role(db, seller_id, UserType::Seller, "apply to campaigns").await?;

    let campaign = campaign::Entity::find_by_id(campaign_id)
        .one(db)
        .await?
        .ok_or(WorkflowError::CampaignNotFound(campaign_id))?;
    if !campaign.is_active() {
        warn!("Seller {} applied to inactive campaign {}", seller_id, campaign_id);
        return Err(WorkflowError::CampaignInactive(campaign_id));
    }

    let message = match entry {
        ApplicationEntry::OneClick => None,
        ApplicationEntry::Messaged { message } => {
            let existing = seller_application::Entity::find()
                .filter(seller_application::Column::CampaignId.eq(campaign_id))
                .filter(seller_application::Column::SellerId.eq(seller_id))
                .one(db)
                .await?;
            if let Some(existing) = existing {
                debug!(
                    "Seller {} already has application {} on campaign {}",
                    seller_id, existing.id, campaign_id
                );
                return Err(WorkflowError::AlreadyApplied {
                    campaign_id,
                    seller_id,
                });
            }
            Some(message.trim().to_string()).filter(|m| !m.is_empty())
        }
    };

    let new_application = seller_application::ActiveModel {
        campaign_id: Set(campaign_id),
        seller_id: Set(seller_id),
        application_message: Set(message),
        status: Set(ApplicationStatus::Pending),
        applied_at: Set(now),
        reviewed_at: Set(None),
        ..Default::default()
    };

    match new_application.insert(db).await {
        Ok(model) => {
            info!(
                "Seller {} applied to campaign {} (application {})",
                seller_id, campaign_id, model.id
            );
            Ok(model)
        }
        Err(err) if WorkflowError::is_unique_violation(&err) => {
            debug!(
                "Unique index rejected duplicate application of seller {} to campaign {}",
                seller_id, campaign_id
            );
            Err(WorkflowError::AlreadyApplied {
                campaign_id,
                seller_id,
            })
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{now, seed_campaign, seed_profile, setup_db};
    use model::entities::campaign::CampaignStatus;

    async fn marketplace() -> (DatabaseConnection, campaign::Model) {
        let db = setup_db().await;
        seed_profile(&db, 1, UserType::Startup).await;
        seed_profile(&db, 2, UserType::Seller).await;
        let campaign = seed_campaign(&db, 1, "Eco Bottle", &["Delhi"], CampaignStatus::Active, now()).await;
        (db, campaign)
    }

    #[tokio::test]
    async fn test_one_click_creates_pending_without_message() {
        let (db, campaign) = marketplace().await;

        let application = submit_application(&db, 2, campaign.id, ApplicationEntry::OneClick, now())
            .await
            .unwrap();
        assert_eq!(application.status, ApplicationStatus::Pending);
        assert_eq!(application.application_message, None);
        assert_eq!(application.applied_at, now());
        assert_eq!(application.reviewed_at, None);
    }

    #[tokio::test]
    async fn test_messaged_rejects_second_application() {
        let (db, campaign) = marketplace().await;
        let entry = ApplicationEntry::Messaged {
            message: "I sell locally".to_string(),
        };

        let first = submit_application(&db, 2, campaign.id, entry.clone(), now())
            .await
            .unwrap();
        assert_eq!(first.application_message.as_deref(), Some("I sell locally"));

        let second = submit_application(&db, 2, campaign.id, entry, now()).await;
        assert!(matches!(
            second,
            Err(WorkflowError::AlreadyApplied { campaign_id, seller_id: 2 }) if campaign_id == campaign.id
        ));

        let rows = seller_application::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_one_click_duplicate_is_caught_by_unique_index() {
        let (db, campaign) = marketplace().await;

        submit_application(&db, 2, campaign.id, ApplicationEntry::OneClick, now())
            .await
            .unwrap();
        let again = submit_application(&db, 2, campaign.id, ApplicationEntry::OneClick, now()).await;
        assert!(matches!(again, Err(WorkflowError::AlreadyApplied { .. })));
    }

    #[tokio::test]
    async fn test_cannot_apply_to_inactive_or_missing_campaign() {
        let db = setup_db().await;
        seed_profile(&db, 1, UserType::Startup).await;
        seed_profile(&db, 2, UserType::Seller).await;
        let hidden = seed_campaign(&db, 1, "Hidden", &[], CampaignStatus::Inactive, now()).await;

        let inactive = submit_application(&db, 2, hidden.id, ApplicationEntry::OneClick, now()).await;
        assert!(matches!(inactive, Err(WorkflowError::CampaignInactive(id)) if id == hidden.id));

        let missing = submit_application(&db, 2, 999, ApplicationEntry::OneClick, now()).await;
        assert!(matches!(missing, Err(WorkflowError::CampaignNotFound(999))));
    }

    #[tokio::test]
    async fn test_startups_cannot_apply() {
        let (db, campaign) = marketplace().await;
        let result = submit_application(&db, 1, campaign.id, ApplicationEntry::OneClick, now()).await;
        assert!(matches!(result, Err(WorkflowError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_blank_message_is_stored_as_none() {
        let (db, campaign) = marketplace().await;
        let application = submit_application(
            &db,
            2,
            campaign.id,
            ApplicationEntry::Messaged {
                message: "   ".to_string(),
            },
            now(),
        )
        .await
        .unwrap();
        assert_eq!(application.application_message, None);
    }
}
