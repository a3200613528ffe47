//! Shared fixtures for the workflow tests: an in-memory SQLite database with
//! migrations applied, plus small seeding helpers.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use migration::{Migrator, MigratorTrait};
use model::entities::campaign::{
    self, CampaignStatus, CommissionType, SalesMaterials, StringList, TargetDemographics,
};
use model::entities::profile::{self, UserType};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};

/// A fixed "now" so timestamps in assertions are predictable.
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// `now()` shifted by `minutes`.
pub fn at(minutes: i64) -> NaiveDateTime {
    now() + Duration::minutes(minutes)
}

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn seed_profile(db: &DatabaseConnection, id: i32, user_type: UserType) -> profile::Model {
    profile::ActiveModel {
        id: Set(id),
        full_name: Set(Some(format!("Person {id}"))),
        email: Set(Some(format!("person{id}@example.com"))),
        user_type: Set(user_type),
        company_name: Set(match user_type {
            UserType::Startup => Some(format!("Company {id}")),
            UserType::Seller => None,
        }),
        city: Set(None),
        state: Set(None),
        phone: Set(None),
        bio: Set(None),
        created_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to seed profile")
}

pub async fn seed_campaign(
    db: &DatabaseConnection,
    owner_id: i32,
    title: &str,
    regions: &[&str],
    status: CampaignStatus,
    created_at: NaiveDateTime,
) -> campaign::Model {
    campaign::ActiveModel {
        owner_id: Set(owner_id),
        title: Set(title.to_string()),
        description: Set(format!("{title} description")),
        product_images: Set(StringList::default()),
        commission_rate: Set(Decimal::new(15, 0)),
        commission_type: Set(CommissionType::Percentage),
        target_regions: Set(StringList(regions.iter().map(|r| r.to_string()).collect())),
        target_demographics: Set(TargetDemographics::default()),
        sales_materials: Set(SalesMaterials::default()),
        status: Set(status),
        created_at: Set(created_at),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed campaign")
}
