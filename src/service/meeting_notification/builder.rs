//! Meeting message builders.
//!
//! This module turns persisted meeting state into the embeds, buttons and notice texts the
//! Discord sink sends. The text helpers are plain functions so they can be checked without a
//! Discord connection.

use entity::meeting_member::MemberStatus;
use serenity::all::{
    ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter, Timestamp,
};

use crate::{
    error::{internal::InternalError, AppError},
    model::{
        activity::{guardian_report_url, report_url, resource_name},
        custom_id::{MeetingAction, CREATE_BUTTON_ID},
        meeting::{Meeting, MeetingMember, MeetingRoster},
        meeting_channel::MeetingChannel,
    },
    service::meeting_notification::MeetingNotice,
};

const LEADER_MARKER: &str = "👑";

const COLOR_ACTIVE: u32 = 0x3498db;
const COLOR_COMPLETED: u32 = 0x2ecc71;

/// Embed title: channel name and the number of free slots.
pub fn roster_title(roster: &MeetingRoster) -> String {
    match roster.slots_left() {
        0 => format!("{}\nFireteam complete", roster.channel.name),
        slots => format!("{}\nSlots left: +{}", roster.channel.name, slots),
    }
}

/// One numbered roster line.
///
/// # Arguments
/// - `position` - 1-based position in the roster
/// - `member` - Active member
/// - `channel` - Meeting channel, for the report site link
///
/// # Returns
/// - `String` - e.g. `#2 <@123>(Guardian#0007) | [42](https://raid.report/pc/46...)`
pub fn roster_row(position: usize, member: &MeetingMember, channel: &MeetingChannel) -> String {
    let mut row = format!("#{} <@{}>", position, member.user_id);

    if let Some(name) = &member.display_name {
        row.push_str(&format!("({})", name));

        let link = match (channel.activity_type, member.membership_type, member.membership_id) {
            (Some(resource), Some(membership_type), Some(membership_id)) => {
                report_url(resource, membership_type, membership_id)
                    .map(|url| (resource, url))
            }
            _ => None,
        };

        match (member.metric_value, link) {
            (Some(value), Some((_, url))) => row.push_str(&format!(" | [{}]({})", value, url)),
            (Some(value), None) => row.push_str(&format!(" | {}", value)),
            (None, Some((resource, url))) => {
                row.push_str(&format!(" | [{}]({})", resource_name(resource), url))
            }
            (None, None) => {}
        }
    }

    if member.status == MemberStatus::Leader {
        row.push(' ');
        row.push_str(LEADER_MARKER);
    }

    row
}

/// Builds the embed presenting a meeting and its roster.
///
/// # Arguments
/// - `roster` - Current meeting state
///
/// # Returns
/// - `Ok(CreateEmbed)` - Embed ready to post or edit
/// - `Err(AppError::InternalErr)` - Start time out of Discord's timestamp range
pub fn build_roster_embed(roster: &MeetingRoster) -> Result<CreateEmbed, AppError> {
    let meeting = &roster.meeting;
    let timestamp = Timestamp::from_unix_timestamp(meeting.start_at.timestamp()).map_err(|e| {
        AppError::InternalErr(InternalError::InvalidDiscordTimestamp {
            timestamp: meeting.start_at.timestamp(),
            reason: e.to_string(),
        })
    })?;

    let rows = roster
        .members
        .iter()
        .enumerate()
        .map(|(index, member)| roster_row(index + 1, member, &roster.channel))
        .collect::<Vec<_>>()
        .join("\n");

    let color = if roster.slots_left() == 0 {
        COLOR_COMPLETED
    } else {
        COLOR_ACTIVE
    };

    let mut embed = CreateEmbed::new()
        .title(roster_title(roster))
        .color(color)
        .field("Fireteam:", rows, false)
        .footer(CreateEmbedFooter::new(format!("ID: {}", meeting.id)))
        .timestamp(timestamp);

    if let Some(comment) = &meeting.comment {
        embed = embed.description(comment);
    }
    if let Some(url) = guardian_report_url(&roster.membership_ids()) {
        embed = embed.url(url);
    }
    if let Some(icon_url) = &roster.channel.icon_url {
        embed = embed.thumbnail(icon_url);
    }

    Ok(embed)
}

/// Buttons attached to a meeting message.
pub fn roster_buttons() -> Vec<CreateActionRow> {
    let button = |action: MeetingAction, label: &str, style: ButtonStyle| {
        CreateButton::new(action.button_id())
            .label(label)
            .style(style)
    };

    vec![
        CreateActionRow::Buttons(vec![
            button(MeetingAction::Join, "Join / Leave", ButtonStyle::Success),
            button(MeetingAction::Notify, "Notify", ButtonStyle::Primary),
        ]),
        CreateActionRow::Buttons(vec![
            button(MeetingAction::Kick, "Kick", ButtonStyle::Secondary),
            button(MeetingAction::Ban, "Ban", ButtonStyle::Secondary),
            button(MeetingAction::Leader, "Transfer leader", ButtonStyle::Secondary),
        ]),
        CreateActionRow::Buttons(vec![
            button(MeetingAction::Description, "Description", ButtonStyle::Secondary),
            button(MeetingAction::Size, "Size", ButtonStyle::Secondary),
            button(MeetingAction::Cancel, "Cancel", ButtonStyle::Danger),
        ]),
    ]
}

/// Embed and button posted once per meeting channel to start the creation form.
pub fn build_channel_init(channel: &MeetingChannel) -> (CreateEmbed, Vec<CreateActionRow>) {
    let mut embed = CreateEmbed::new().title(&channel.name);
    if let Some(description) = &channel.description {
        embed = embed.description(description);
    }
    if let Some(icon_url) = &channel.icon_url {
        embed = embed.thumbnail(icon_url);
    }

    let button = CreateButton::new(CREATE_BUTTON_ID)
        .label("Create meeting")
        .style(ButtonStyle::Success);

    (embed, vec![CreateActionRow::Buttons(vec![button])])
}

/// Text of a direct message or log post about a meeting.
///
/// Open meetings get a link to their message appended.
///
/// # Arguments
/// - `meeting` - Meeting the notice is about
/// - `notice` - What happened
/// - `guild_id` - Guild of the meeting message, for the jump link
pub fn notice_text(meeting: &Meeting, notice: &MeetingNotice, guild_id: u64) -> String {
    let mut text = match notice {
        MeetingNotice::Completed => format!("Meeting {} is complete, the fireteam is full.", meeting.id),
        MeetingNotice::Reopened { user_id } => format!(
            "<@{}> left meeting {}, it is recruiting again.",
            user_id, meeting.id
        ),
        MeetingNotice::Canceled { reason } => {
            format!("Meeting {} was canceled. Reason: {}", meeting.id, reason)
        }
        MeetingNotice::Removed { status, reason } => {
            let verb = if *status == MemberStatus::Banned {
                "banned"
            } else {
                "kicked"
            };
            format!(
                "You were {} from meeting {}. Reason: {}",
                verb, meeting.id, reason
            )
        }
        MeetingNotice::LeaderAssigned { previous_leader_id } => format!(
            "<@{}> made you the leader of meeting {}.",
            previous_leader_id, meeting.id
        ),
        MeetingNotice::Announcement { sender_id, text } => format!(
            "Message from <@{}> about meeting {}:\n{}",
            sender_id, meeting.id, text
        ),
        MeetingNotice::Closed { status } => {
            format!("Meeting {} closed: {}.", meeting.id, status.label())
        }
    };

    if let Some(message) = meeting.message.filter(|_| !meeting.status.is_terminal()) {
        text.push('\n');
        text.push_str(&message.jump_url(guild_id));
    }

    text
}
