//! Meeting channel configuration.

use entity::meeting_channel::ActivityResource;

use sea_orm::DbErr;

use crate::util::parse::parse_stored_id;

/// A Discord channel in which meetings can be created.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingChannel {
    /// Channel holding the "Create meeting" message and receiving immediate meetings.
    pub channel_id: u64,
    /// Channel receiving meetings scheduled for a later time.
    pub planned_channel_id: u64,
    pub name: String,
    pub description: Option<String>,
    /// Text posted alongside each meeting message, typically a role mention.
    pub custom_meeting_text: Option<String>,
    pub icon_url: Option<String>,
    pub default_members_count: i32,
    pub max_members_count: i32,
    pub activity_type: Option<ActivityResource>,
    /// Bungie metric hashes summed into each roster entry's metric value.
    pub metric_hashes: Vec<u32>,
    pub create_meeting_message_id: Option<u64>,
}

impl MeetingChannel {
    /// Converts an entity model to a meeting channel domain model at the repository boundary.
    ///
    /// Metric hashes that are not unsigned integers are dropped.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(MeetingChannel)` - The converted domain model
    /// - `Err(DbErr::Custom)` - A stored Discord id is not a valid u64
    pub fn from_entity(entity: entity::meeting_channel::Model) -> Result<Self, DbErr> {
        let metric_hashes = entity
            .metric_hashes
            .as_ref()
            .and_then(|value| value.as_array())
            .map(|values| {
                values
                    .iter()
                    .filter_map(|value| value.as_u64())
                    .filter_map(|value| u32::try_from(value).ok())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            channel_id: parse_stored_id("channel_id", &entity.channel_id)?,
            planned_channel_id: parse_stored_id("planned_channel_id", &entity.planned_channel_id)?,
            name: entity.name,
            description: entity.description,
            custom_meeting_text: entity.custom_meeting_text,
            icon_url: entity.icon_url,
            default_members_count: entity.default_members_count,
            max_members_count: entity.max_members_count,
            activity_type: entity.activity_type,
            metric_hashes,
            create_meeting_message_id: entity
                .create_meeting_message_id
                .map(|id| parse_stored_id("create_meeting_message_id", &id))
                .transpose()?,
        })
    }

    /// Channel a new meeting is posted to.
    ///
    /// # Arguments
    /// - `planned` - Whether the meeting was scheduled for a later start
    pub fn post_channel_id(&self, planned: bool) -> u64 {
        if planned {
            self.planned_channel_id
        } else {
            self.channel_id
        }
    }
}

/// Parameters for registering or updating a meeting channel.
#[derive(Debug, Clone)]
pub struct UpsertMeetingChannelParams {
    pub channel_id: u64,
    /// Defaults to `channel_id` when absent.
    pub planned_channel_id: Option<u64>,
    pub name: String,
    pub description: Option<String>,
    pub custom_meeting_text: Option<String>,
    pub icon_url: Option<String>,
    pub default_members_count: i32,
    pub max_members_count: i32,
    pub activity_type: Option<ActivityResource>,
    pub metric_hashes: Vec<u32>,
}
