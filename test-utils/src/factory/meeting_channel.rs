//! Meeting channel factory.

use crate::factory::helpers::{next_id, next_snowflake};
use entity::meeting_channel::ActivityResource;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating meeting channel configuration rows.
///
/// # Example
///
/// ```rust,ignore
/// let channel = MeetingChannelFactory::new(&db)
///     .max_members_count(3)
///     .activity_type(Some(ActivityResource::RaidReport))
///     .build()
///     .await?;
/// ```
pub struct MeetingChannelFactory<'a> {
    db: &'a DatabaseConnection,
    channel_id: String,
    planned_channel_id: String,
    name: String,
    icon_url: Option<String>,
    default_members_count: i32,
    max_members_count: i32,
    activity_type: Option<ActivityResource>,
    metric_hashes: Option<serde_json::Value>,
}

impl<'a> MeetingChannelFactory<'a> {
    /// Creates a new factory with defaults.
    ///
    /// Defaults:
    /// - name: `"Channel {id}"`
    /// - default_members_count: `3`
    /// - max_members_count: `6`
    /// - no activity resource, icon or metric hashes
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            channel_id: next_snowflake(),
            planned_channel_id: next_snowflake(),
            name: format!("Channel {}", id),
            icon_url: None,
            default_members_count: 3,
            max_members_count: 6,
            activity_type: None,
            metric_hashes: None,
        }
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn icon_url(mut self, icon_url: Option<String>) -> Self {
        self.icon_url = icon_url;
        self
    }

    pub fn default_members_count(mut self, count: i32) -> Self {
        self.default_members_count = count;
        self
    }

    pub fn max_members_count(mut self, count: i32) -> Self {
        self.max_members_count = count;
        self
    }

    pub fn activity_type(mut self, activity_type: Option<ActivityResource>) -> Self {
        self.activity_type = activity_type;
        self
    }

    /// Sets the metric hashes summed into roster annotations.
    pub fn metric_hashes(mut self, hashes: &[u32]) -> Self {
        self.metric_hashes = Some(serde_json::json!(hashes));
        self
    }

    /// Inserts the channel into the database.
    ///
    /// # Returns
    /// - `Ok(Model)` - Created channel
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::meeting_channel::Model, DbErr> {
        entity::meeting_channel::ActiveModel {
            channel_id: ActiveValue::Set(self.channel_id),
            planned_channel_id: ActiveValue::Set(self.planned_channel_id),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(None),
            custom_meeting_text: ActiveValue::Set(None),
            icon_url: ActiveValue::Set(self.icon_url),
            default_members_count: ActiveValue::Set(self.default_members_count),
            max_members_count: ActiveValue::Set(self.max_members_count),
            activity_type: ActiveValue::Set(self.activity_type),
            metric_hashes: ActiveValue::Set(self.metric_hashes),
            create_meeting_message_id: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a meeting channel with default values.
pub async fn create_meeting_channel(
    db: &DatabaseConnection,
) -> Result<entity::meeting_channel::Model, DbErr> {
    MeetingChannelFactory::new(db).build().await
}
