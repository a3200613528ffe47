use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Profiles are keyed by the external identity id, so no autoincrement
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(integer(Profiles::Id).primary_key())
                    .col(string_null(Profiles::FullName))
                    .col(string_null(Profiles::Email))
                    .col(string_len(Profiles::UserType, 16))
                    .col(string_null(Profiles::CompanyName))
                    .col(string_null(Profiles::City))
                    .col(string_null(Profiles::State))
                    .col(string_null(Profiles::Phone))
                    .col(text_null(Profiles::Bio))
                    .col(date_time(Profiles::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(pk_auto(Campaigns::Id))
                    .col(integer(Campaigns::OwnerId))
                    .col(string(Campaigns::Title))
                    .col(text(Campaigns::Description))
                    .col(json(Campaigns::ProductImages))
                    .col(decimal_len(Campaigns::CommissionRate, 10, 2))
                    .col(string_len(Campaigns::CommissionType, 16).default("percentage"))
                    .col(json(Campaigns::TargetRegions))
                    .col(json(Campaigns::TargetDemographics))
                    .col(json(Campaigns::SalesMaterials))
                    .col(string_len(Campaigns::Status, 16).default("active"))
                    .col(date_time(Campaigns::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_owner")
                            .from(Campaigns::Table, Campaigns::OwnerId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SellerApplications::Table)
                    .if_not_exists()
                    .col(pk_auto(SellerApplications::Id))
                    .col(integer(SellerApplications::CampaignId))
                    .col(integer(SellerApplications::SellerId))
                    .col(text_null(SellerApplications::ApplicationMessage))
                    .col(string_len(SellerApplications::Status, 16).default("pending"))
                    .col(date_time(SellerApplications::AppliedAt).default(Expr::current_timestamp()))
                    .col(date_time_null(SellerApplications::ReviewedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seller_application_campaign")
                            .from(SellerApplications::Table, SellerApplications::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seller_application_seller")
                            .from(SellerApplications::Table, SellerApplications::SellerId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One application per (campaign, seller)
        manager
            .create_index(
                Index::create()
                    .name("idx_seller_applications_campaign_seller")
                    .table(SellerApplications::Table)
                    .col(SellerApplications::CampaignId)
                    .col(SellerApplications::SellerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SellerApplications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Campaigns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    FullName,
    Email,
    UserType,
    CompanyName,
    City,
    State,
    Phone,
    Bio,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Campaigns {
    Table,
    Id,
    OwnerId,
    Title,
    Description,
    ProductImages,
    CommissionRate,
    CommissionType,
    TargetRegions,
    TargetDemographics,
    SalesMaterials,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SellerApplications {
    Table,
    Id,
    CampaignId,
    SellerId,
    ApplicationMessage,
    Status,
    AppliedAt,
    ReviewedAt,
}
