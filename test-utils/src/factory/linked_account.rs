//! Factory for Discord to Bungie.net account links.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Links a Discord user to a Bungie.net membership id.
pub async fn create_linked_account(
    db: &DatabaseConnection,
    discord_id: &str,
    bungie_id: i64,
) -> Result<entity::linked_account::Model, DbErr> {
    entity::linked_account::ActiveModel {
        discord_id: ActiveValue::Set(discord_id.to_string()),
        bungie_id: ActiveValue::Set(bungie_id),
        linked_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
