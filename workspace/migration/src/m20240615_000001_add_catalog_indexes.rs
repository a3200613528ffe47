use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Catalog: status = active ORDER BY created_at DESC
        manager
            .create_index(
                Index::create()
                    .name("idx_campaigns_status_created_at")
                    .table(Alias::new("campaigns"))
                    .col(Alias::new("status"))
                    .col(Alias::new("created_at"))
                    .to_owned(),
            )
            .await?;

        // Review and dashboard: campaigns by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_campaigns_owner_id")
                    .table(Alias::new("campaigns"))
                    .col(Alias::new("owner_id"))
                    .to_owned(),
            )
            .await?;

        // Seller dashboard: applications by seller
        manager
            .create_index(
                Index::create()
                    .name("idx_seller_applications_seller_id")
                    .table(Alias::new("seller_applications"))
                    .col(Alias::new("seller_id"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_seller_applications_seller_id", "seller_applications"),
            ("idx_campaigns_owner_id", "campaigns"),
            ("idx_campaigns_status_created_at", "campaigns"),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
