//! Meeting creation flow.
//!
//! The creation form is validated, the author is warned about meetings of theirs starting
//! within two hours of the new one, and the meeting is published, scheduled for expiry and
//! its leader annotated.

use std::time::Duration;

use chrono::Utc;
use entity::meeting::MeetingStatus;
use serenity::all::{
    ButtonStyle, Context, CreateActionRow, CreateButton, EditInteractionResponse,
    ModalInteraction,
};

use crate::{
    bot::handler::interaction::form,
    error::AppError,
    model::{
        custom_id::CONFIRM_PUBLISH_ID,
        meeting::{CreateMeetingParams, Meeting},
    },
    service::{meeting::MeetingService, meeting_notification::MeetingNotificationService},
    state::BotState,
    util::parse::{parse_fireteam_size, parse_start_time},
};

/// How long the author has to confirm an overlapping meeting.
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(300);

/// Creates and publishes a meeting from a submitted creation form.
///
/// The form interaction must already be deferred.
///
/// # Arguments
/// - `state` - Shared bot state
/// - `ctx` - Discord context for the confirmation prompt
/// - `modal` - The submitted form
/// - `channel_id` - Meeting channel the form was opened in
///
/// # Returns
/// - `Ok(String)` - Link to the new meeting, or a note that confirmation timed out
/// - `Err(AppError)` - Invalid input, or creating or publishing failed
pub async fn create_meeting(
    state: &BotState,
    ctx: &Context,
    modal: &ModalInteraction,
    channel_id: u64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let fireteam_max = parse_fireteam_size(&form::input_value(modal, form::SIZE_INPUT))?;
    let start_at = match form::input_value(modal, form::START_INPUT).trim() {
        "" => None,
        input => Some(parse_start_time(input, now, state.settings.utc_offset)?),
    };
    let author_id = modal.user.id.get();

    let overlapping = MeetingService::new(&state.db)
        .find_overlapping(author_id, start_at.unwrap_or(now))
        .await?;
    if !overlapping.is_empty() && !confirm_overlap(state, ctx, modal, &overlapping).await? {
        return Ok("Confirmation timed out, the meeting was not created.".to_string());
    }

    let params = CreateMeetingParams {
        channel_id,
        author_id,
        fireteam_max,
        comment: Some(form::input_value(modal, form::DESCRIPTION_INPUT)),
        start_at,
    };

    publish_meeting(state, params).await
}

/// Asks the author to confirm a meeting overlapping their other meetings.
///
/// # Returns
/// - `Ok(true)` - The author confirmed in time
/// - `Ok(false)` - No confirmation within the timeout
/// - `Err(AppError)` - The prompt could not be shown
async fn confirm_overlap(
    state: &BotState,
    ctx: &Context,
    modal: &ModalInteraction,
    overlapping: &[Meeting],
) -> Result<bool, AppError> {
    let button = CreateButton::new(CONFIRM_PUBLISH_ID)
        .label("Publish anyway")
        .style(ButtonStyle::Danger);

    let prompt = modal
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new()
                .content(overlap_warning(overlapping, state.settings.guild_id))
                .components(vec![CreateActionRow::Buttons(vec![button])]),
        )
        .await?;

    let Some(press) = prompt
        .await_component_interaction(&ctx.shard)
        .author_id(modal.user.id)
        .custom_ids(vec![CONFIRM_PUBLISH_ID.to_string()])
        .timeout(CONFIRM_TIMEOUT)
        .await
    else {
        tracing::debug!("User {} did not confirm an overlapping meeting", modal.user.id);
        return Ok(false);
    };

    press.defer(&ctx.http).await?;

    Ok(true)
}

async fn publish_meeting(state: &BotState, params: CreateMeetingParams) -> Result<String, AppError> {
    let meeting = MeetingService::new(&state.db)
        .create(params, Utc::now())
        .await?;

    let notifications = MeetingNotificationService::new(&state.db, state.sink.as_ref());
    let message = notifications.publish(meeting.id).await?;

    if meeting.status == MeetingStatus::Completed {
        notifications.completed(&meeting).await;
    }

    state.expiry.schedule(meeting.id, meeting.actual_until);
    tokio::spawn(annotate_leader(state.clone(), meeting.id, meeting.author_id));

    Ok(format!(
        "Meeting created: {}",
        message.jump_url(state.settings.guild_id)
    ))
}

async fn annotate_leader(state: BotState, meeting_id: i32, leader_id: u64) {
    match MeetingService::new(&state.db)
        .annotate_member(state.stats.as_ref(), meeting_id, leader_id)
        .await
    {
        Ok(true) => {
            MeetingNotificationService::new(&state.db, state.sink.as_ref())
                .refresh(meeting_id)
                .await
        }
        Ok(false) => {}
        Err(e) => tracing::error!(
            "Failed to annotate leader {} of meeting {}: {}",
            leader_id,
            meeting_id,
            e
        ),
    }
}

/// Prompt listing the author's meetings that start close to the new one.
pub fn overlap_warning(meetings: &[Meeting], guild_id: u64) -> String {
    let mut text =
        "You already take part in meetings starting around the same time:".to_string();

    for meeting in meetings {
        let place = meeting
            .message
            .map(|message| message.jump_url(guild_id))
            .unwrap_or_else(|| format!("meeting {}", meeting.id));
        text.push_str(&format!(
            "\n- <t:{}:f> {}",
            meeting.start_at.timestamp(),
            place
        ));
    }

    text.push_str("\nPublish the new meeting anyway?");
    text
}
