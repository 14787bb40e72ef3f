use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MeetingChannel::Table)
                    .if_not_exists()
                    .col(string(MeetingChannel::ChannelId).primary_key())
                    .col(string(MeetingChannel::PlannedChannelId))
                    .col(string(MeetingChannel::Name))
                    .col(text_null(MeetingChannel::Description))
                    .col(text_null(MeetingChannel::CustomMeetingText))
                    .col(string_null(MeetingChannel::IconUrl))
                    .col(integer(MeetingChannel::DefaultMembersCount))
                    .col(integer(MeetingChannel::MaxMembersCount))
                    .col(string_len_null(MeetingChannel::ActivityType, 32))
                    .col(json_null(MeetingChannel::MetricHashes))
                    .col(string_null(MeetingChannel::CreateMeetingMessageId))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeetingChannel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MeetingChannel {
    Table,
    ChannelId,
    PlannedChannelId,
    Name,
    Description,
    CustomMeetingText,
    IconUrl,
    DefaultMembersCount,
    MaxMembersCount,
    ActivityType,
    MetricHashes,
    CreateMeetingMessageId,
}
