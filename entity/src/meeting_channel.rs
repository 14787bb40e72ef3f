use sea_orm::entity::prelude::*;

/// Third-party report site linked from roster entries of a channel's meetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ActivityResource {
    #[sea_orm(string_value = "raid_report")]
    RaidReport,
    #[sea_orm(string_value = "dungeon_report")]
    DungeonReport,
    #[sea_orm(string_value = "crucible_report")]
    CrucibleReport,
    #[sea_orm(string_value = "trials_report")]
    TrialsReport,
    #[sea_orm(string_value = "nightfall_report")]
    NightfallReport,
    #[sea_orm(string_value = "triumph_report")]
    TriumphReport,
    #[sea_orm(string_value = "destiny_tracker")]
    DestinyTracker,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "meeting_channel")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub channel_id: String,
    pub planned_channel_id: String,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub custom_meeting_text: Option<String>,
    #[sea_orm(nullable)]
    pub icon_url: Option<String>,
    pub default_members_count: i32,
    pub max_members_count: i32,
    #[sea_orm(nullable)]
    pub activity_type: Option<ActivityResource>,
    #[sea_orm(nullable)]
    pub metric_hashes: Option<Json>,
    #[sea_orm(nullable)]
    pub create_meeting_message_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meeting::Entity")]
    Meeting,
}

impl Related<super::meeting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meeting.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
