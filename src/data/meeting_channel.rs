use sea_orm::{
    sea_query::OnConflict, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter,
};

use crate::model::meeting_channel::{MeetingChannel, UpsertMeetingChannelParams};

pub struct MeetingChannelRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MeetingChannelRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates or updates a meeting channel by its channel id.
    ///
    /// The stored "Create meeting" message id is kept when an existing channel is updated.
    ///
    /// # Arguments
    /// - `params` - Channel configuration
    ///
    /// # Returns
    /// - `Ok(MeetingChannel)` - The stored channel
    /// - `Err(DbErr)` - Database error
    pub async fn upsert(&self, params: UpsertMeetingChannelParams) -> Result<MeetingChannel, DbErr> {
        use entity::meeting_channel::Column;

        let channel_id = params.channel_id.to_string();
        let planned_channel_id = params
            .planned_channel_id
            .unwrap_or(params.channel_id)
            .to_string();
        let metric_hashes =
            (!params.metric_hashes.is_empty()).then(|| serde_json::json!(params.metric_hashes));

        let model = entity::meeting_channel::ActiveModel {
            channel_id: ActiveValue::Set(channel_id.clone()),
            planned_channel_id: ActiveValue::Set(planned_channel_id),
            name: ActiveValue::Set(params.name),
            description: ActiveValue::Set(params.description),
            custom_meeting_text: ActiveValue::Set(params.custom_meeting_text),
            icon_url: ActiveValue::Set(params.icon_url),
            default_members_count: ActiveValue::Set(params.default_members_count),
            max_members_count: ActiveValue::Set(params.max_members_count),
            activity_type: ActiveValue::Set(params.activity_type),
            metric_hashes: ActiveValue::Set(metric_hashes),
            create_meeting_message_id: ActiveValue::NotSet,
        };

        entity::prelude::MeetingChannel::insert(model)
            .on_conflict(
                OnConflict::column(Column::ChannelId)
                    .update_columns([
                        Column::PlannedChannelId,
                        Column::Name,
                        Column::Description,
                        Column::CustomMeetingText,
                        Column::IconUrl,
                        Column::DefaultMembersCount,
                        Column::MaxMembersCount,
                        Column::ActivityType,
                        Column::MetricHashes,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        let stored = entity::prelude::MeetingChannel::find_by_id(channel_id)
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("meeting_channel".to_string()))?;

        MeetingChannel::from_entity(stored)
    }

    /// Gets a meeting channel by Discord channel id.
    ///
    /// # Returns
    /// - `Ok(Some(MeetingChannel))` - Channel is configured for meetings
    /// - `Ok(None)` - Channel is not configured
    /// - `Err(DbErr)` - Database error
    pub async fn find_by_channel_id(&self, channel_id: u64) -> Result<Option<MeetingChannel>, DbErr> {
        entity::prelude::MeetingChannel::find_by_id(channel_id.to_string())
            .one(self.db)
            .await?
            .map(MeetingChannel::from_entity)
            .transpose()
    }

    /// Records the message carrying the channel's "Create meeting" button.
    pub async fn set_create_meeting_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<(), DbErr> {
        entity::prelude::MeetingChannel::update_many()
            .set(entity::meeting_channel::ActiveModel {
                create_meeting_message_id: ActiveValue::Set(Some(message_id.to_string())),
                ..Default::default()
            })
            .filter(entity::meeting_channel::Column::ChannelId.eq(channel_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
