//! Roster entry factory.

use chrono::Utc;
use entity::meeting_member::MemberStatus;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates a roster entry for a user with the given status.
///
/// # Arguments
/// - `db` - Database connection
/// - `meeting_id` - Meeting the entry belongs to
/// - `user_id` - Discord user id
/// - `status` - Member status to record
///
/// # Returns
/// - `Ok(Model)` - Created roster entry
/// - `Err(DbErr)` - Database error during insert
pub async fn create_member(
    db: &DatabaseConnection,
    meeting_id: i32,
    user_id: &str,
    status: MemberStatus,
) -> Result<entity::meeting_member::Model, DbErr> {
    entity::meeting_member::ActiveModel {
        meeting_id: ActiveValue::Set(meeting_id),
        user_id: ActiveValue::Set(user_id.to_string()),
        status: ActiveValue::Set(status),
        last_update: ActiveValue::Set(Utc::now()),
        display_name: ActiveValue::Set(None),
        membership_id: ActiveValue::Set(None),
        membership_type: ActiveValue::Set(None),
        metric_value: ActiveValue::Set(None),
    }
    .insert(db)
    .await
}
