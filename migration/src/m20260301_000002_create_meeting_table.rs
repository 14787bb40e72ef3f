use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000001_create_meeting_channel_table::MeetingChannel;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meeting::Table)
                    .if_not_exists()
                    .col(pk_auto(Meeting::Id))
                    .col(string(Meeting::ChannelId))
                    .col(string_null(Meeting::MessageChannelId))
                    .col(string_null(Meeting::MessageId))
                    .col(string_len(Meeting::Status, 32))
                    .col(boolean(Meeting::Planned).default(false))
                    .col(string(Meeting::AuthorId))
                    .col(integer(Meeting::FireteamMax))
                    .col(text_null(Meeting::Comment))
                    .col(
                        timestamp_with_time_zone(Meeting::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone(Meeting::StartAt))
                    .col(timestamp_with_time_zone_null(Meeting::CompleteAt))
                    .col(timestamp_with_time_zone(Meeting::ActualUntil))
                    .col(integer(Meeting::RosterVersion).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meeting_channel_id")
                            .from(Meeting::Table, Meeting::ChannelId)
                            .to(MeetingChannel::Table, MeetingChannel::ChannelId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Message delete events look meetings up by their posted message
        manager
            .create_index(
                Index::create()
                    .name("idx_meeting_message_id")
                    .table(Meeting::Table)
                    .col(Meeting::MessageId)
                    .to_owned(),
            )
            .await?;

        // Sweeper scans open meetings by deadline
        manager
            .create_index(
                Index::create()
                    .name("idx_meeting_status_actual_until")
                    .table(Meeting::Table)
                    .col(Meeting::Status)
                    .col(Meeting::ActualUntil)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_meeting_status_actual_until")
                    .table(Meeting::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_meeting_message_id")
                    .table(Meeting::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Meeting::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Meeting {
    Table,
    Id,
    ChannelId,
    MessageChannelId,
    MessageId,
    Status,
    Planned,
    AuthorId,
    FireteamMax,
    Comment,
    CreatedAt,
    StartAt,
    CompleteAt,
    ActualUntil,
    RosterVersion,
}
