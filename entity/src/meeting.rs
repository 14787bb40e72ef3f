use sea_orm::entity::prelude::*;

/// Lifecycle status of a meeting.
///
/// `Active` and `Completed` are the only states a meeting can leave; every other
/// variant is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum MeetingStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "canceled")]
    Canceled,
    #[sea_orm(string_value = "deleted_by_other_user")]
    DeletedByOtherUser,
    #[sea_orm(string_value = "deleted_by_completed")]
    DeletedByCompleted,
    #[sea_orm(string_value = "deleted_by_overdue")]
    DeletedByOverdue,
}

impl MeetingStatus {
    /// Statuses a meeting can still transition out of.
    pub const OPEN: [MeetingStatus; 2] = [MeetingStatus::Active, MeetingStatus::Completed];

    pub fn is_terminal(&self) -> bool {
        !Self::OPEN.contains(self)
    }

    /// Human readable label used in embeds and log messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Recruiting",
            Self::Completed => "Fireteam complete",
            Self::Canceled => "Canceled",
            Self::DeletedByOtherUser => "Deleted",
            Self::DeletedByCompleted => "Deleted after completion",
            Self::DeletedByOverdue => "Deleted after expiry",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "meeting")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub channel_id: String,
    #[sea_orm(nullable)]
    pub message_channel_id: Option<String>,
    #[sea_orm(nullable, indexed)]
    pub message_id: Option<String>,
    #[sea_orm(indexed)]
    pub status: MeetingStatus,
    pub planned: bool,
    #[sea_orm(indexed)]
    pub author_id: String,
    pub fireteam_max: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub created_at: DateTimeUtc,
    pub start_at: DateTimeUtc,
    #[sea_orm(nullable)]
    pub complete_at: Option<DateTimeUtc>,
    #[sea_orm(indexed)]
    pub actual_until: DateTimeUtc,
    pub roster_version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::meeting_channel::Entity",
        from = "Column::ChannelId",
        to = "super::meeting_channel::Column::ChannelId",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    MeetingChannel,
    #[sea_orm(has_many = "super::meeting_member::Entity")]
    MeetingMember,
}

impl Related<super::meeting_channel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeetingChannel.def()
    }
}

impl Related<super::meeting_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeetingMember.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
