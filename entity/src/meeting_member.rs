use sea_orm::entity::prelude::*;

/// A user's relationship to one meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum MemberStatus {
    #[sea_orm(string_value = "leader")]
    Leader,
    #[sea_orm(string_value = "member")]
    Member,
    #[sea_orm(string_value = "left")]
    Left,
    #[sea_orm(string_value = "kicked")]
    Kicked,
    #[sea_orm(string_value = "banned")]
    Banned,
}

impl MemberStatus {
    /// Statuses that occupy a roster slot.
    pub const ACTIVE: [MemberStatus; 2] = [MemberStatus::Leader, MemberStatus::Member];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Leader => "Leader",
            Self::Member => "Member",
            Self::Left => "Left",
            Self::Kicked => "Kicked",
            Self::Banned => "Banned",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "meeting_member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub meeting_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(indexed)]
    pub status: MemberStatus,
    pub last_update: DateTimeUtc,
    #[sea_orm(nullable)]
    pub display_name: Option<String>,
    #[sea_orm(nullable)]
    pub membership_id: Option<i64>,
    #[sea_orm(nullable)]
    pub membership_type: Option<i32>,
    #[sea_orm(nullable)]
    pub metric_value: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::meeting::Entity",
        from = "Column::MeetingId",
        to = "super::meeting::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Meeting,
}

impl Related<super::meeting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meeting.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
