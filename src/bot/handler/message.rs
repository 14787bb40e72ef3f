//! Message event handlers.
//!
//! Only deletions matter to meetings: when somebody removes the message of an active meeting,
//! the meeting is closed as deleted by another user. Deletions the bot performs itself happen
//! after the meeting is already terminal and are ignored by the status predicate.

use serenity::all::{ChannelId, Context, GuildId, MessageId};

use crate::{
    service::{meeting::MeetingService, meeting_notification::MeetingNotificationService},
    state::BotState,
};

/// Handles a message delete event.
///
/// # Arguments
/// - `state` - Shared bot state
/// - `_ctx` - Discord context (unused)
/// - `channel_id` - Channel the message was deleted from
/// - `deleted_message_id` - Id of the deleted message
/// - `_guild_id` - Guild of the channel (unused)
pub async fn handle_message_delete(
    state: &BotState,
    _ctx: Context,
    channel_id: ChannelId,
    deleted_message_id: MessageId,
    _guild_id: Option<GuildId>,
) {
    let meeting = match MeetingService::new(&state.db)
        .handle_message_deleted(deleted_message_id.get())
        .await
    {
        Ok(Some(meeting)) => meeting,
        Ok(None) => return,
        Err(e) => {
            tracing::error!(
                "Failed to close meeting of deleted message {} in channel {}: {}",
                deleted_message_id,
                channel_id,
                e
            );
            return;
        }
    };

    MeetingNotificationService::new(&state.db, state.sink.as_ref())
        .closed(&meeting, false)
        .await;
}
