//! Bungie.net OAuth refresh tokens, keyed by Bungie.net membership id.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bungie_token")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub bungie_id: i64,
    #[sea_orm(indexed)]
    pub discord_id: String,
    #[sea_orm(column_type = "Text")]
    pub refresh_token: String,
    pub refresh_expires_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
