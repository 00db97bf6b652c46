use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tours::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tours::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tours::Name).string().not_null())
                    .col(ColumnDef::new(Tours::Description).text().null())
                    .col(
                        ColumnDef::new(Tours::PriceCredits)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(Tours::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchasedTours::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchasedTours::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PurchasedTours::UserId).uuid().not_null())
                    .col(ColumnDef::new(PurchasedTours::TourId).uuid().not_null())
                    .col(
                        ColumnDef::new(PurchasedTours::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchased_tours_tour")
                            .from(PurchasedTours::Table, PurchasedTours::TourId)
                            .to(Tours::Table, Tours::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A user can buy a given tour at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_purchased_tours_user_tour")
                    .table(PurchasedTours::Table)
                    .col(PurchasedTours::UserId)
                    .col(PurchasedTours::TourId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PurchasedTours::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tours::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tours {
    Table,
    Id,
    Name,
    Description,
    PriceCredits,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PurchasedTours {
    Table,
    Id,
    UserId,
    TourId,
    CreatedAt,
}
