use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod targeting;

pub use targeting::{SalesMaterials, StringList, TargetDemographics};

/// How the commission rate of a campaign is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CommissionType {
    /// Percentage of the sale price, between 0 and 100.
    #[sea_orm(string_value = "percentage")]
    Percentage,
    /// Fixed amount per sale.
    #[sea_orm(string_value = "flat")]
    Flat,
}

/// Catalog visibility of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// A product-distribution listing created by a startup.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Profile id of the startup that owns the campaign.
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    /// Hosted image URLs, in display order.
    #[sea_orm(column_type = "Json")]
    pub product_images: StringList,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub commission_rate: Decimal,
    pub commission_type: CommissionType,
    #[sea_orm(column_type = "Json")]
    pub target_regions: StringList,
    #[sea_orm(column_type = "Json")]
    pub target_demographics: TargetDemographics,
    #[sea_orm(column_type = "Json")]
    pub sales_materials: SalesMaterials,
    pub status: CampaignStatus,
    pub created_at: NaiveDateTime,
}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A campaign belongs to exactly one owner.
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::OwnerId",
        to = "super::profile::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::seller_application::Entity")]
    SellerApplication,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::seller_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SellerApplication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
