//! SeaORM entities for the marketplace: profiles, the campaigns startups
//! list, and the applications sellers submit to them.

pub mod campaign;
pub mod profile;
pub mod seller_application;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::campaign::Entity as Campaign;
    pub use super::profile::Entity as Profile;
    pub use super::seller_application::Entity as SellerApplication;
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use campaign::{CampaignStatus, CommissionType, SalesMaterials, StringList, TargetDemographics};
    use prelude::*;
    use profile::UserType;
    use seller_application::ApplicationStatus;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_profile(
        db: &DatabaseConnection,
        id: i32,
        user_type: UserType,
    ) -> Result<profile::Model, DbErr> {
        profile::ActiveModel {
            id: Set(id),
            full_name: Set(Some(format!("user {id}"))),
            email: Set(Some(format!("user{id}@example.com"))),
            user_type: Set(user_type),
            company_name: Set(None),
            city: Set(None),
            state: Set(None),
            phone: Set(None),
            bio: Set(None),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await
    }

    async fn insert_campaign(db: &DatabaseConnection, owner_id: i32) -> Result<campaign::Model, DbErr> {
        campaign::ActiveModel {
            owner_id: Set(owner_id),
            title: Set("Eco Bottle".to_string()),
            description: Set("Reusable steel bottle".to_string()),
            product_images: Set(StringList(vec!["https://img.example.com/1.png".to_string()])),
            commission_rate: Set(Decimal::new(15, 0)),
            commission_type: Set(CommissionType::Percentage),
            target_regions: Set(StringList(vec!["Delhi".to_string(), "Mumbai".to_string()])),
            target_demographics: Set(TargetDemographics {
                age_groups: vec!["18-25".to_string()],
                interests: "outdoors".to_string(),
                ..Default::default()
            }),
            sales_materials: Set(SalesMaterials {
                brochures: Some("https://docs.example.com/b.pdf".to_string()),
                ..Default::default()
            }),
            status: Set(CampaignStatus::Active),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let startup = insert_profile(&db, 1, UserType::Startup).await?;
        let seller = insert_profile(&db, 2, UserType::Seller).await?;
        let campaign = insert_campaign(&db, startup.id).await?;

        let application = seller_application::ActiveModel {
            campaign_id: Set(campaign.id),
            seller_id: Set(seller.id),
            application_message: Set(Some("I sell locally".to_string())),
            status: Set(ApplicationStatus::Pending),
            applied_at: Set(Utc::now().naive_utc()),
            reviewed_at: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // JSON columns come back with their structure intact
        let stored = Campaign::find_by_id(campaign.id).one(&db).await?.unwrap();
        assert_eq!(stored.target_regions.0, vec!["Delhi", "Mumbai"]);
        assert_eq!(stored.target_demographics.age_groups, vec!["18-25"]);
        assert_eq!(stored.target_demographics.interests, "outdoors");
        assert_eq!(
            stored.sales_materials.brochures.as_deref(),
            Some("https://docs.example.com/b.pdf")
        );
        assert_eq!(stored.commission_rate, Decimal::new(15, 0));

        // Owner relation
        let owner = stored.find_related(Profile).one(&db).await?.unwrap();
        assert_eq!(owner.id, startup.id);

        // Applications through the campaign
        let applications = stored.find_related(SellerApplication).all(&db).await?;
        assert_eq!(applications.len(), 1);
        assert_eq!(applications[0].id, application.id);

        // Applications submitted by the seller
        let by_seller = SellerApplication::find()
            .filter(seller_application::Column::SellerId.eq(seller.id))
            .all(&db)
            .await?;
        assert_eq!(by_seller.len(), 1);
        assert_eq!(by_seller[0].status, ApplicationStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_application_is_rejected_by_unique_index() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let startup = insert_profile(&db, 1, UserType::Startup).await?;
        let seller = insert_profile(&db, 2, UserType::Seller).await?;
        let campaign = insert_campaign(&db, startup.id).await?;

        let new_application = || seller_application::ActiveModel {
            campaign_id: Set(campaign.id),
            seller_id: Set(seller.id),
            application_message: Set(None),
            status: Set(ApplicationStatus::Pending),
            applied_at: Set(Utc::now().naive_utc()),
            reviewed_at: Set(None),
            ..Default::default()
        };

        new_application().insert(&db).await?;
        let second = new_application().insert(&db).await;
        assert!(second.is_err(), "second application for the same pair must fail");

        let count = SellerApplication::find().all(&db).await?.len();
        assert_eq!(count, 1);
        Ok(())
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(ApplicationStatus::Approved.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
    }
}
