use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which side of the marketplace a profile belongs to.
/// Chosen at signup and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[sea_orm(string_value = "startup")]
    Startup,
    #[sea_orm(string_value = "seller")]
    Seller,
}

/// Public profile of an authenticated identity.
///
/// The primary key is the identity id handed out by the external identity
/// provider, so there is exactly one profile per identity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub user_type: UserType,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Campaigns listed by this profile (startups only).
    #[sea_orm(has_many = "super::campaign::Entity")]
    Campaign,
    /// Applications submitted by this profile (sellers only).
    #[sea_orm(has_many = "super::seller_application::Entity")]
    SellerApplication,
}

impl Related<super::campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl Related<super::seller_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SellerApplication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
