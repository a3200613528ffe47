//! Role-conditioned dashboard: the actor's profile plus figures computed from
//! their campaigns or applications.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use model::entities::campaign::{self, CommissionType};
use model::entities::profile::{self, UserType};
use model::entities::seller_application::{self, ApplicationStatus};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::profiles::get_profile;

/// How many entries the recent activity feed keeps.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupSummary {
    pub active_campaigns: usize,
    /// Distinct sellers with at least one approved application.
    pub partner_sellers: usize,
    pub pending_applications: usize,
    /// Distinct target regions across active campaigns.
    pub regions_covered: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerSummary {
    pub applications_submitted: usize,
    pub approved: usize,
    pub pending: usize,
    /// Mean percentage commission over approved campaigns; `None` when there
    /// are none.
    pub average_commission: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardSummary {
    Startup(StartupSummary),
    Seller(SellerSummary),
}

/// One application event in the activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub application_id: i32,
    pub campaign_id: i32,
    pub campaign_title: String,
    pub seller_id: i32,
    pub status: ApplicationStatus,
    /// `reviewed_at` once reviewed, otherwise `applied_at`.
    pub occurred_at: NaiveDateTime,
}

impl ActivityEntry {
    fn new(application: &seller_application::Model, campaign: &campaign::Model) -> Self {
        Self {
            application_id: application.id,
            campaign_id: campaign.id,
            campaign_title: campaign.title.clone(),
            seller_id: application.seller_id,
            status: application.status,
            occurred_at: application.reviewed_at.unwrap_or(application.applied_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub profile: profile::Model,
    pub summary: DashboardSummary,
    pub recent_activity: Vec<ActivityEntry>,
}

/// Builds the dashboard of `user_id`, failing with `ProfileNotFound` when the
/// identity never completed signup.
#[instrument(skip(db))]
pub async fn load_dashboard(db: &DatabaseConnection, user_id: i32) -> Result<Dashboard> {
    let profile = get_profile(db, user_id).await?;

    let (summary, mut activity) = match profile.user_type {
        UserType::Startup => startup_view(db, user_id).await?,
        UserType::Seller => seller_view(db, user_id).await?,
    };

    activity.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then(b.application_id.cmp(&a.application_id))
    });
    activity.truncate(RECENT_ACTIVITY_LIMIT);

    debug!("Dashboard for {} has {} activity entries", user_id, activity.len());
    Ok(Dashboard {
        profile,
        summary,
        recent_activity: activity,
    })
}

async fn startup_view(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<(DashboardSummary, Vec<ActivityEntry>)> {
    let campaigns = campaign::Entity::find()
        .filter(campaign::Column::OwnerId.eq(owner_id))
        .find_with_related(seller_application::Entity)
        .all(db)
        .await?;

    let mut regions = BTreeSet::new();
    let mut partners = BTreeSet::new();
    let mut active_campaigns = 0;
    let mut pending_applications = 0;
    let mut activity = Vec::new();

    for (campaign, applications) in &campaigns {
        if campaign.is_active() {
            active_campaigns += 1;
            regions.extend(campaign.target_regions.iter().cloned());
        }
        for application in applications {
            match application.status {
                ApplicationStatus::Approved => {
                    partners.insert(application.seller_id);
                }
                ApplicationStatus::Pending => pending_applications += 1,
                ApplicationStatus::Rejected => {}
            }
            activity.push(ActivityEntry::new(application, campaign));
        }
    }

    let summary = StartupSummary {
        active_campaigns,
        partner_sellers: partners.len(),
        pending_applications,
        regions_covered: regions.len(),
    };
    Ok((DashboardSummary::Startup(summary), activity))
}

async fn seller_view(
    db: &DatabaseConnection,
    seller_id: i32,
) -> Result<(DashboardSummary, Vec<ActivityEntry>)> {
    let rows = seller_application::Entity::find()
        .filter(seller_application::Column::SellerId.eq(seller_id))
        .find_also_related(campaign::Entity)
        .all(db)
        .await?;

    let mut approved = 0;
    let mut pending = 0;
    let mut approved_rates = Vec::new();
    let mut activity = Vec::new();

    for (application, campaign) in &rows {
        match application.status {
            ApplicationStatus::Approved => approved += 1,
            ApplicationStatus::Pending => pending += 1,
            ApplicationStatus::Rejected => {}
        }
        let Some(campaign) = campaign else { continue };
        if application.status == ApplicationStatus::Approved
            && campaign.commission_type == CommissionType::Percentage
        {
            approved_rates.push(campaign.commission_rate);
        }
        activity.push(ActivityEntry::new(application, campaign));
    }

    let summary = SellerSummary {
        applications_submitted: rows.len(),
        approved,
        pending,
        average_commission: average(&approved_rates),
    };
    Ok((DashboardSummary::Seller(summary), activity))
}

fn average(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let total: Decimal = values.iter().sum();
    Some((total / Decimal::from(values.len())).round_dp(2))
}
