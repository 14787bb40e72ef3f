use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000002_create_meeting_table::Meeting;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MeetingMember::Table)
                    .if_not_exists()
                    .col(integer(MeetingMember::MeetingId))
                    .col(string(MeetingMember::UserId))
                    .col(string_len(MeetingMember::Status, 16))
                    .col(
                        timestamp_with_time_zone(MeetingMember::LastUpdate)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(string_null(MeetingMember::DisplayName))
                    .col(big_integer_null(MeetingMember::MembershipId))
                    .col(integer_null(MeetingMember::MembershipType))
                    .col(big_integer_null(MeetingMember::MetricValue))
                    .primary_key(
                        Index::create()
                            .name("pk_meeting_member")
                            .col(MeetingMember::MeetingId)
                            .col(MeetingMember::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meeting_member_meeting_id")
                            .from(MeetingMember::Table, MeetingMember::MeetingId)
                            .to(Meeting::Table, Meeting::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeetingMember::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MeetingMember {
    Table,
    MeetingId,
    UserId,
    Status,
    LastUpdate,
    DisplayName,
    MembershipId,
    MembershipType,
    MetricValue,
}
