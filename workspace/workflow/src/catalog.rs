//! Campaign catalog: the list of active campaigns sellers browse, with text
//! search and a region filter.

use std::collections::BTreeSet;

use model::entities::campaign::{self, CampaignStatus};
use model::entities::profile;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, instrument};

use crate::error::Result;

/// An active campaign together with the owner fields shown next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignListing {
    pub campaign: campaign::Model,
    pub owner_full_name: Option<String>,
    pub owner_company_name: Option<String>,
}

impl CampaignListing {
    fn new(campaign: campaign::Model, owner: Option<profile::Model>) -> Self {
        Self {
            campaign,
            owner_full_name: owner.as_ref().and_then(|o| o.full_name.clone()),
            owner_company_name: owner.and_then(|o| o.company_name),
        }
    }
}

/// Loads every active campaign, newest first.
#[instrument(skip(db))]
pub async fn load_active_campaigns(db: &DatabaseConnection) -> Result<Vec<CampaignListing>> {
    let rows = campaign::Entity::find()
        .filter(campaign::Column::Status.eq(CampaignStatus::Active))
        .order_by_desc(campaign::Column::CreatedAt)
        .order_by_desc(campaign::Column::Id)
        .find_also_related(profile::Entity)
        .all(db)
        .await?;

    debug!("Loaded {} active campaigns", rows.len());
    Ok(rows
        .into_iter()
        .map(|(campaign, owner)| CampaignListing::new(campaign, owner))
        .collect())
}

/// Search and region criteria. Empty values mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive substring matched against title and description.
    pub search: Option<String>,
    /// Exact region name that must be among the campaign's target regions.
    pub region: Option<String>,
}

impl CatalogFilter {
    pub fn matches(&self, campaign: &campaign::Model) -> bool {
        let matches_search = match self.search.as_deref().filter(|s| !s.is_empty()) {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                campaign.title.to_lowercase().contains(&term)
                    || campaign.description.to_lowercase().contains(&term)
            }
        };

        let matches_region = match self.region.as_deref().filter(|r| !r.is_empty()) {
            None => true,
            Some(region) => campaign.target_regions.contains(region),
        };

        matches_search && matches_region
    }

    /// Returns the listings that match, keeping their order.
    pub fn apply<'a, I>(&self, listings: I) -> Vec<CampaignListing>
    where
        I: IntoIterator<Item = &'a CampaignListing>,
    {
        listings
            .into_iter()
            .filter(|listing| self.matches(&listing.campaign))
            .cloned()
            .collect()
    }
}

/// Sorted union of target regions across the given listings.
pub fn available_regions<'a, I>(listings: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CampaignListing>,
{
    listings
        .into_iter()
        .flat_map(|listing| listing.campaign.target_regions.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, seed_campaign, seed_profile, setup_db};
    use model::entities::profile::UserType;

    fn titles(listings: &[CampaignListing]) -> Vec<&str> {
        listings.iter().map(|l| l.campaign.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_only_active_campaigns_newest_first() {
        let db = setup_db().await;
        seed_profile(&db, 1, UserType::Startup).await;
        seed_campaign(&db, 1, "Old", &[], CampaignStatus::Active, at(0)).await;
        seed_campaign(&db, 1, "Hidden", &[], CampaignStatus::Inactive, at(5)).await;
        seed_campaign(&db, 1, "New", &[], CampaignStatus::Active, at(10)).await;

        let listings = load_active_campaigns(&db).await.unwrap();
        assert_eq!(titles(&listings), vec!["New", "Old"]);
        assert_eq!(listings[0].owner_company_name.as_deref(), Some("Company 1"));
        assert_eq!(listings[0].owner_full_name.as_deref(), Some("Person 1"));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = setup_db().await;
        seed_profile(&db, 1, UserType::Startup).await;
        seed_campaign(&db, 1, "Eco Bottle", &[], CampaignStatus::Active, at(0)).await;
        seed_campaign(&db, 1, "Organic Cream", &[], CampaignStatus::Active, at(1)).await;

        let listings = load_active_campaigns(&db).await.unwrap();
        let filter = CatalogFilter {
            search: Some("eco".to_string()),
            region: None,
        };
        assert_eq!(titles(&filter.apply(&listings)), vec!["Eco Bottle"]);

        // Description is searched too
        let filter = CatalogFilter {
            search: Some("CREAM DESC".to_string()),
            region: None,
        };
        assert_eq!(titles(&filter.apply(&listings)), vec!["Organic Cream"]);
    }

    #[tokio::test]
    async fn test_region_filter_and_region_union() {
        let db = setup_db().await;
        seed_profile(&db, 1, UserType::Startup).await;
        seed_campaign(&db, 1, "A", &["Delhi", "Mumbai"], CampaignStatus::Active, at(0)).await;
        seed_campaign(&db, 1, "B", &["Chennai"], CampaignStatus::Active, at(1)).await;

        let listings = load_active_campaigns(&db).await.unwrap();
        let filter = CatalogFilter {
            search: None,
            region: Some("Delhi".to_string()),
        };
        assert_eq!(titles(&filter.apply(&listings)), vec!["A"]);
        assert_eq!(
            available_regions(&listings),
            vec!["Chennai".to_string(), "Delhi".to_string(), "Mumbai".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_filter_matches_everything() {
        let db = setup_db().await;
        seed_profile(&db, 1, UserType::Startup).await;
        seed_campaign(&db, 1, "A", &["Delhi"], CampaignStatus::Active, at(0)).await;
        seed_campaign(&db, 1, "B", &[], CampaignStatus::Active, at(1)).await;

        let listings = load_active_campaigns(&db).await.unwrap();
        let filter = CatalogFilter {
            search: Some(String::new()),
            region: Some(String::new()),
        };
        assert_eq!(filter.apply(&listings).len(), 2);
        assert_eq!(CatalogFilter::default().apply(&listings).len(), 2);
    }
}
