//! Factory for stored Bungie.net OAuth refresh tokens.

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Stores a refresh token valid for 90 days.
pub async fn create_bungie_token(
    db: &DatabaseConnection,
    discord_id: &str,
    bungie_id: i64,
    refresh_token: &str,
) -> Result<entity::bungie_token::Model, DbErr> {
    entity::bungie_token::ActiveModel {
        bungie_id: ActiveValue::Set(bungie_id),
        discord_id: ActiveValue::Set(discord_id.to_string()),
        refresh_token: ActiveValue::Set(refresh_token.to_string()),
        refresh_expires_at: ActiveValue::Set(Utc::now() + Duration::days(90)),
    }
    .insert(db)
    .await
}
