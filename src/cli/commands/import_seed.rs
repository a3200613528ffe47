use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use model::entities::campaign::{
    self, CampaignStatus, CommissionType, SalesMaterials, TargetDemographics,
};
use model::entities::profile::UserType;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use thiserror::Error;
use tracing::{debug, info, trace, warn};
use workflow::authoring::{self, CampaignChanges, CampaignDraft};
use workflow::profiles::{self, NewProfile};
use workflow::review::{self, ReviewDecision};
use workflow::submission::{self, ApplicationEntry};
use workflow::WorkflowError;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("application refers to unknown campaign key '{0}'")]
    UnknownCampaign(String),
    #[error("campaign key '{0}' is used more than once")]
    DuplicateCampaignKey(String),
}

/// Demo fixture: profiles first, then campaigns, then applications.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub profiles: Vec<SeedProfile>,
    #[serde(default)]
    pub campaigns: Vec<SeedCampaign>,
    #[serde(default)]
    pub applications: Vec<SeedApplication>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProfile {
    pub id: i32,
    pub user_type: UserType,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCampaign {
    /// Name the applications section uses to point at this campaign
    pub key: String,
    pub owner_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub commission_rate: Decimal,
    pub commission_type: CommissionType,
    #[serde(default)]
    pub target_regions: Vec<String>,
    #[serde(default)]
    pub target_demographics: TargetDemographics,
    #[serde(default)]
    pub product_images: Vec<String>,
    #[serde(default)]
    pub sales_materials: SalesMaterials,
    #[serde(default = "active")]
    pub status: CampaignStatus,
}

fn active() -> CampaignStatus {
    CampaignStatus::Active
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedOutcome {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Deserialize)]
pub struct SeedApplication {
    pub campaign: String,
    pub seller_id: i32,
    pub message: Option<String>,
    #[serde(default = "pending")]
    pub status: SeedOutcome,
}

fn pending() -> SeedOutcome {
    SeedOutcome::Pending
}

/// Counts of rows written by one import
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub profiles: usize,
    pub campaigns: usize,
    pub applications: usize,
    pub skipped: usize,
}

pub fn parse_seed(yaml: &str) -> Result<SeedFile> {
    let seed: SeedFile = serde_yaml::from_str(yaml).context("Failed to parse seed YAML")?;
    Ok(seed)
}

/// Write a fixture through the regular workflows, so every role and
/// ownership rule applies. Rows from an earlier import are skipped: profiles
/// by id, campaigns by owner and title, applications by campaign and seller.
pub async fn apply_seed(db: &DatabaseConnection, seed: SeedFile, now: NaiveDateTime) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for p in seed.profiles {
        let new_profile = NewProfile {
            full_name: p.full_name,
            email: p.email,
            user_type: p.user_type,
            company_name: p.company_name,
            city: p.city,
            state: p.state,
            phone: p.phone,
            bio: p.bio,
        };
        match profiles::create_profile(db, p.id, new_profile, now).await {
            Ok(_) => report.profiles += 1,
            Err(WorkflowError::ProfileExists(id)) => {
                warn!("Profile {} already exists, skipping", id);
                report.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let mut campaign_ids: HashMap<String, (i32, i32)> = HashMap::new();
    let mut existing_campaigns = HashSet::new();
    let mut to_close = Vec::new();
    for c in seed.campaigns {
        if campaign_ids.contains_key(&c.key) {
            return Err(SeedError::DuplicateCampaignKey(c.key).into());
        }

        let existing = campaign::Entity::find()
            .filter(campaign::Column::OwnerId.eq(c.owner_id))
            .filter(campaign::Column::Title.eq(c.title.trim()))
            .one(db)
            .await?;
        if let Some(existing) = existing {
            warn!("Campaign '{}' already exists as ID {}, skipping", c.key, existing.id);
            if c.status == CampaignStatus::Inactive && existing.is_active() {
                to_close.push((existing.id, existing.owner_id));
            }
            existing_campaigns.insert(existing.id);
            campaign_ids.insert(c.key, (existing.id, existing.owner_id));
            report.skipped += 1;
            continue;
        }

        let draft = CampaignDraft {
            title: c.title,
            description: c.description,
            commission_rate: c.commission_rate,
            commission_type: c.commission_type,
            target_regions: c.target_regions,
            target_demographics: c.target_demographics,
            product_images: c.product_images,
            sales_materials: c.sales_materials,
        };
        let created = authoring::create_campaign(db, c.owner_id, draft, now)
            .await
            .with_context(|| format!("Failed to import campaign '{}'", c.key))?;
        debug!("Imported campaign '{}' -> ID {}", c.key, created.id);

        // Applications need an active campaign; inactive ones are closed afterwards
        if c.status == CampaignStatus::Inactive {
            to_close.push((created.id, created.owner_id));
        }
        campaign_ids.insert(c.key, (created.id, created.owner_id));
        report.campaigns += 1;
    }

    for a in seed.applications {
        let (campaign_id, owner_id) = *campaign_ids
            .get(&a.campaign)
            .ok_or_else(|| SeedError::UnknownCampaign(a.campaign.clone()))?;

        let entry = match a.message {
            Some(message) => ApplicationEntry::Messaged { message },
            None => ApplicationEntry::OneClick,
        };
        let application = match submission::submit_application(db, a.seller_id, campaign_id, entry, now).await {
            Ok(application) => application,
            Err(WorkflowError::AlreadyApplied { .. }) => {
                warn!("Seller {} already applied to '{}', skipping", a.seller_id, a.campaign);
                report.skipped += 1;
                continue;
            }
            // Closed by the earlier import, after its applications went in
            Err(WorkflowError::CampaignInactive(id)) if existing_campaigns.contains(&id) => {
                warn!("Campaign '{}' is closed, skipping application of seller {}", a.campaign, a.seller_id);
                report.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let decision = match a.status {
            SeedOutcome::Pending => None,
            SeedOutcome::Approved => Some(ReviewDecision::Approve),
            SeedOutcome::Rejected => Some(ReviewDecision::Reject),
        };
        if let Some(decision) = decision {
            review::review_application(db, owner_id, application.id, decision, now).await?;
        }
        report.applications += 1;
    }

    for (campaign_id, owner_id) in to_close {
        let changes = CampaignChanges {
            status: Some(CampaignStatus::Inactive),
            ..Default::default()
        };
        authoring::update_campaign(db, owner_id, campaign_id, changes).await?;
    }

    Ok(report)
}

pub async fn import_seed(yaml_path: &str, database_url: &str) -> Result<()> {
    trace!("Entering import_seed function");
    info!("Importing seed data from {}", yaml_path);

    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let yaml = fs::read_to_string(yaml_path)
        .with_context(|| format!("Failed to open file: {}", yaml_path))?;
    let seed = parse_seed(&yaml)?;
    debug!(
        "Seed holds {} profiles, {} campaigns, {} applications",
        seed.profiles.len(),
        seed.campaigns.len(),
        seed.applications.len()
    );

    let report = apply_seed(&db, seed, Utc::now().naive_utc()).await?;
    info!(
        "Seed import finished: {} profiles, {} campaigns, {} applications, {} skipped",
        report.profiles, report.campaigns, report.applications, report.skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;
    use chrono::NaiveDate;
    use model::entities::seller_application;

    const SEED: &str = r#"
profiles:
  - id: 1
    user_type: startup
    full_name: Asha Rao
    company_name: GreenLeaf
  - id: 2
    user_type: seller
    full_name: Vikram Shah
    city: Pune
campaigns:
  - key: bottles
    owner_id: 1
    title: Eco bottles
    commission_rate: 12.5
    commission_type: percentage
    target_regions: [Pune, Mumbai, Pune]
  - key: old
    owner_id: 1
    title: Winter jackets
    commission_rate: 300
    commission_type: flat
    status: inactive
applications:
  - campaign: bottles
    seller_id: 2
    message: I run a stall at the Sunday market
    status: approved
  - campaign: old
    seller_id: 2
"#;

    fn seed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_seed_import_runs_through_workflows() {
        let db = setup_test_db().await;
        let seed = parse_seed(SEED).unwrap();

        let report = apply_seed(&db, seed, seed_time()).await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                profiles: 2,
                campaigns: 2,
                applications: 2,
                skipped: 0
            }
        );

        let campaigns = campaign::Entity::find().all(&db).await.unwrap();
        let bottles = campaigns.iter().find(|c| c.title == "Eco bottles").unwrap();
        assert_eq!(bottles.target_regions.0, vec!["Pune", "Mumbai"]);
        let jackets = campaigns.iter().find(|c| c.title == "Winter jackets").unwrap();
        assert_eq!(jackets.status, CampaignStatus::Inactive);

        let applications = seller_application::Entity::find().all(&db).await.unwrap();
        let approved = applications
            .iter()
            .find(|a| a.campaign_id == bottles.id)
            .unwrap();
        assert_eq!(approved.reviewed_at, Some(seed_time()));
    }

    #[tokio::test]
    async fn test_seed_import_skips_existing_profiles() {
        let db = setup_test_db().await;
        let profiles_only = "profiles:\n  - id: 7\n    user_type: seller\n";

        apply_seed(&db, parse_seed(profiles_only).unwrap(), seed_time())
            .await
            .unwrap();
        let again = apply_seed(&db, parse_seed(profiles_only).unwrap(), seed_time())
            .await
            .unwrap();
        assert_eq!(again.profiles, 0);
        assert_eq!(again.skipped, 1);
    }

    #[tokio::test]
    async fn test_seed_import_twice_keeps_one_copy() {
        let db = setup_test_db().await;
        apply_seed(&db, parse_seed(SEED).unwrap(), seed_time())
            .await
            .unwrap();

        let again = apply_seed(&db, parse_seed(SEED).unwrap(), seed_time())
            .await
            .unwrap();
        assert_eq!(
            again,
            SeedReport {
                profiles: 0,
                campaigns: 0,
                applications: 0,
                skipped: 6
            }
        );
        assert_eq!(campaign::Entity::find().all(&db).await.unwrap().len(), 2);
        assert_eq!(seller_application::Entity::find().all(&db).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_campaign_key_is_an_error() {
        let db = setup_test_db().await;
        let yaml = "applications:\n  - campaign: nope\n    seller_id: 1\n";

        let err = apply_seed(&db, parse_seed(yaml).unwrap(), seed_time())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
