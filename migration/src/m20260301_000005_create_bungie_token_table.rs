use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BungieToken::Table)
                    .if_not_exists()
                    .col(big_integer(BungieToken::BungieId).primary_key())
                    .col(string(BungieToken::DiscordId))
                    .col(text(BungieToken::RefreshToken))
                    .col(timestamp_with_time_zone(BungieToken::RefreshExpiresAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bungie_token_discord_id")
                    .table(BungieToken::Table)
                    .col(BungieToken::DiscordId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_bungie_token_discord_id")
                    .table(BungieToken::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(BungieToken::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum BungieToken {
    Table,
    BungieId,
    DiscordId,
    RefreshToken,
    RefreshExpiresAt,
}
