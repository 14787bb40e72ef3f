//! Discord implementation of `MeetingSink`.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    all::{ChannelId, CreateMessage, EditMessage, MessageId, UserId},
    http::Http,
};

use crate::{
    error::AppError,
    model::{
        meeting::{Meeting, MeetingRoster, MessageRef},
        settings::MeetingSettings,
    },
    service::meeting_notification::{builder, LogTarget, MeetingNotice, MeetingSink},
};

/// Sends meeting output through the bot's HTTP client.
pub struct DiscordMeetingSink {
    http: Arc<Http>,
    settings: MeetingSettings,
}

impl DiscordMeetingSink {
    pub fn new(http: Arc<Http>, settings: MeetingSettings) -> Self {
        Self { http, settings }
    }
}

#[async_trait]
impl MeetingSink for DiscordMeetingSink {
    async fn publish(&self, roster: &MeetingRoster) -> Result<MessageRef, AppError> {
        let channel_id = ChannelId::new(roster.channel.post_channel_id(roster.meeting.planned));

        let mut message = CreateMessage::new()
            .embed(builder::build_roster_embed(roster)?)
            .components(builder::roster_buttons());
        if let Some(text) = &roster.channel.custom_meeting_text {
            message = message.content(text);
        }

        let posted = channel_id.send_message(&self.http, message).await?;

        Ok(MessageRef {
            channel_id: posted.channel_id.get(),
            message_id: posted.id.get(),
        })
    }

    async fn render(&self, roster: &MeetingRoster) -> Result<(), AppError> {
        let Some(message) = roster.meeting.message else {
            return Ok(());
        };

        let edit = EditMessage::new()
            .embed(builder::build_roster_embed(roster)?)
            .components(builder::roster_buttons());

        self.http
            .edit_message(
                ChannelId::new(message.channel_id),
                MessageId::new(message.message_id),
                &edit,
                vec![],
            )
            .await?;

        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), AppError> {
        self.http
            .delete_message(
                ChannelId::new(message.channel_id),
                MessageId::new(message.message_id),
                None,
            )
            .await?;

        Ok(())
    }

    async fn notify_user(
        &self,
        user_id: u64,
        meeting: &Meeting,
        notice: &MeetingNotice,
    ) -> Result<(), AppError> {
        let text = builder::notice_text(meeting, notice, self.settings.guild_id);
        let channel = UserId::new(user_id).create_dm_channel(&self.http).await?;

        channel
            .id
            .send_message(&self.http, CreateMessage::new().content(text))
            .await?;

        Ok(())
    }

    async fn log(
        &self,
        target: LogTarget,
        meeting: &Meeting,
        notice: &MeetingNotice,
    ) -> Result<(), AppError> {
        let channel_id = match target {
            LogTarget::Meetings => self.settings.log_channel_id,
            LogTarget::Notifications => self.settings.notify_log_channel_id,
        };
        let Some(channel_id) = channel_id else {
            return Ok(());
        };

        let text = builder::notice_text(meeting, notice, self.settings.guild_id);
        ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().content(text))
            .await?;

        Ok(())
    }
}
