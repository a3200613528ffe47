//! Application review ("match & onboard").
//!
//! Owners see every application to their campaigns and move pending ones to
//! approved or rejected. Both target states are terminal.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use model::entities::campaign::{self, CampaignStatus, CommissionType};
use model::entities::profile;
use model::entities::seller_application::{self, ApplicationStatus};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, WorkflowError};

/// An application joined with its campaign and the applying seller.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDetail {
    pub application: seller_application::Model,
    pub campaign: campaign::Model,
    /// `None` only if the seller's profile row is gone.
    pub seller: Option<profile::Model>,
}

/// Applications split the way the review screen shows them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationBoard {
    pub pending: Vec<ApplicationDetail>,
    pub reviewed: Vec<ApplicationDetail>,
}

impl ApplicationBoard {
    /// Splits by status, keeping the incoming order in each group.
    pub fn split(details: Vec<ApplicationDetail>) -> Self {
        let (pending, reviewed): (Vec<_>, Vec<_>) = details
            .into_iter()
            .partition(|d| d.application.status == ApplicationStatus::Pending);
        Self { pending, reviewed }
    }
}

/// Application counts of one campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignApplicationStats {
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

impl CampaignApplicationStats {
    fn from_rows(campaign: campaign::Model, applications: &[seller_application::Model]) -> Self {
        let count = |status| applications.iter().filter(|a| a.status == status).count();
        Self {
            campaign_id: campaign.id,
            title: campaign.title,
            commission_rate: campaign.commission_rate,
            commission_type: campaign.commission_type,
            status: campaign.status,
            total: applications.len(),
            approved: count(ApplicationStatus::Approved),
            pending: count(ApplicationStatus::Pending),
            rejected: count(ApplicationStatus::Rejected),
        }
    }
}

/// Owner's verdict on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(self) -> ApplicationStatus {
        match self {
            ReviewDecision::Approve => ApplicationStatus::Approved,
            ReviewDecision::Reject => ApplicationStatus::Rejected,
        }
    }
}

/// Every application on campaigns owned by `owner_id`, newest first.
#[instrument(skip(db))]
pub async fn list_owner_applications(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<Vec<ApplicationDetail>> {
    let rows = seller_application::Entity::find()
        .find_also_related(campaign::Entity)
        .filter(campaign::Column::OwnerId.eq(owner_id))
        .order_by_desc(seller_application::Column::AppliedAt)
        .order_by_desc(seller_application::Column::Id)
        .all(db)
        .await?;
    debug!("Found {} applications for owner {}", rows.len(), owner_id);

    let mut seller_ids: Vec<i32> = rows.iter().map(|(a, _)| a.seller_id).collect();
    seller_ids.sort_unstable();
    seller_ids.dedup();

    let sellers: HashMap<i32, profile::Model> = if seller_ids.is_empty() {
        HashMap::new()
    } else {
        profile::Entity::find()
            .filter(profile::Column::Id.is_in(seller_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect()
    };

    Ok(rows
        .into_iter()
        .filter_map(|(application, campaign)| {
            let campaign = campaign?;
            let seller = sellers.get(&application.seller_id).cloned();
            Some(ApplicationDetail {
                application,
                campaign,
                seller,
            })
        })
        .collect())
}

/// Per-campaign application counts for every campaign of `owner_id`,
/// including campaigns without applications.
#[instrument(skip(db))]
pub async fn campaign_application_stats(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<Vec<CampaignApplicationStats>> {
    let rows = campaign::Entity::find()
        .filter(campaign::Column::OwnerId.eq(owner_id))
        .order_by_desc(campaign::Column::CreatedAt)
        .order_by_desc(campaign::Column::Id)
        .find_with_related(seller_application::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(campaign, applications)| CampaignApplicationStats::from_rows(campaign, &applications))
        .collect())
}

/// Moves a pending application to approved or rejected and stamps
/// `reviewed_at`.
///
/// Only the owner of the parent campaign may review. The update is
/// conditional on the row still being pending, so of two concurrent reviews
/// exactly one wins and the other gets `AlreadyReviewed`.
#[instrument(skip(db))]
pub async fn review_application(
    db: &DatabaseConnection,
    reviewer_id: i32,
    application_id: i32,
    decision: ReviewDecision,
    now: NaiveDateTime,
) -> Result<seller_application::Model> {
    let (application, campaign) = seller_application::Entity::find_by_id(application_id)
        .find_also_related(campaign::Entity)
        .one(db)
        .await?
        .ok_or(WorkflowError::ApplicationNotFound(application_id))?;
    let campaign = campaign.ok_or(WorkflowError::CampaignNotFound(application.campaign_id))?;

    if campaign.owner_id != reviewer_id {
        warn!(
            "Actor {} tried to review application {} on campaign {} owned by {}",
            reviewer_id, application_id, campaign.id, campaign.owner_id
        );
        return Err(WorkflowError::Forbidden(
            "only the campaign owner can review its applications".to_string(),
        ));
    }

    if application.status.is_terminal() {
        return Err(WorkflowError::AlreadyReviewed {
            application_id,
            status: application.status,
        });
    }

    let target = decision.target_status();
    let reviewed = settle_pending(db, application_id, target, now).await?;

    info!(
        "Application {} on campaign {} moved to {:?} by {}",
        application_id, campaign.id, target, reviewer_id
    );
    Ok(reviewed)
}

/// Move a pending application to `target`. The update only matches a row
/// that is still pending, so of two racing reviews exactly one succeeds and
/// the other gets `AlreadyReviewed` with the winning status.
async fn settle_pending(
    db: &DatabaseConnection,
    application_id: i32,
    target: ApplicationStatus,
    now: NaiveDateTime,
) -> Result<seller_application::Model> {
    let result = seller_application::Entity::update_many()
        .col_expr(seller_application::Column::Status, Expr::value(target))
        .col_expr(seller_application::Column::ReviewedAt, Expr::value(now))
        .filter(seller_application::Column::Id.eq(application_id))
        .filter(seller_application::Column::Status.eq(ApplicationStatus::Pending))
        .exec(db)
        .await?;

    let current = seller_application::Entity::find_by_id(application_id)
        .one(db)
        .await?
        .ok_or(WorkflowError::ApplicationNotFound(application_id))?;

    if result.rows_affected == 0 {
        warn!(
            "Application {} was reviewed concurrently and is now {:?}",
            application_id, current.status
        );
        return Err(WorkflowError::AlreadyReviewed {
            application_id,
            status: current.status,
        });
    }

    Ok(current)
}
