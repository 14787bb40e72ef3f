use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LinkedAccount::Table)
                    .if_not_exists()
                    .col(string(LinkedAccount::DiscordId).primary_key())
                    .col(big_integer(LinkedAccount::BungieId))
                    .col(
                        timestamp_with_time_zone(LinkedAccount::LinkedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LinkedAccount::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum LinkedAccount {
    Table,
    DiscordId,
    BungieId,
    LinkedAt,
}
