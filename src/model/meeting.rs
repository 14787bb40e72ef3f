//! Domain models for meetings and their rosters.

use chrono::{DateTime, Utc};
use entity::{meeting::MeetingStatus, meeting_member::MemberStatus};

use sea_orm::DbErr;

use crate::{model::meeting_channel::MeetingChannel, util::parse::parse_stored_id};

/// Location of the chat message presenting a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

impl MessageRef {
    /// Link that jumps to the message in the Discord client.
    pub fn jump_url(&self, guild_id: u64) -> String {
        format!(
            "https://discord.com/channels/{}/{}/{}",
            guild_id, self.channel_id, self.message_id
        )
    }
}

/// A group activity sign-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Meeting {
    pub id: i32,
    /// Meeting channel the meeting was created from.
    pub channel_id: u64,
    /// Posted message, absent until the meeting has been published.
    pub message: Option<MessageRef>,
    pub status: MeetingStatus,
    pub planned: bool,
    pub author_id: u64,
    pub fireteam_max: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub start_at: DateTime<Utc>,
    pub complete_at: Option<DateTime<Utc>>,
    /// Deadline after which the expiry sweeper closes the meeting.
    pub actual_until: DateTime<Utc>,
    pub roster_version: i32,
}

impl Meeting {
    /// Converts an entity model to a meeting domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(Meeting)` - The converted domain model
    /// - `Err(DbErr::Custom)` - A stored Discord id is not a valid u64
    pub fn from_entity(entity: entity::meeting::Model) -> Result<Self, DbErr> {
        let message = match (entity.message_channel_id, entity.message_id) {
            (Some(channel_id), Some(message_id)) => Some(MessageRef {
                channel_id: parse_stored_id("message_channel_id", &channel_id)?,
                message_id: parse_stored_id("message_id", &message_id)?,
            }),
            _ => None,
        };

        Ok(Self {
            id: entity.id,
            channel_id: parse_stored_id("channel_id", &entity.channel_id)?,
            message,
            status: entity.status,
            planned: entity.planned,
            author_id: parse_stored_id("author_id", &entity.author_id)?,
            fireteam_max: entity.fireteam_max,
            comment: entity.comment,
            created_at: entity.created_at,
            start_at: entity.start_at,
            complete_at: entity.complete_at,
            actual_until: entity.actual_until,
            roster_version: entity.roster_version,
        })
    }
}

/// A user's entry on a meeting roster.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingMember {
    pub meeting_id: i32,
    pub user_id: u64,
    pub status: MemberStatus,
    pub last_update: DateTime<Utc>,
    /// Bungie name of the user's main profile.
    pub display_name: Option<String>,
    pub membership_id: Option<i64>,
    pub membership_type: Option<i32>,
    pub metric_value: Option<i64>,
}

impl MeetingMember {
    /// Converts an entity model to a roster entry at the repository boundary.
    pub fn from_entity(entity: entity::meeting_member::Model) -> Result<Self, DbErr> {
        Ok(Self {
            meeting_id: entity.meeting_id,
            user_id: parse_stored_id("user_id", &entity.user_id)?,
            status: entity.status,
            last_update: entity.last_update,
            display_name: entity.display_name,
            membership_id: entity.membership_id,
            membership_type: entity.membership_type,
            metric_value: entity.metric_value,
        })
    }
}

/// A meeting together with its channel and active roster, as shown to users.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingRoster {
    pub meeting: Meeting,
    pub channel: MeetingChannel,
    /// Active members, leader first, then in order of joining.
    pub members: Vec<MeetingMember>,
}

impl MeetingRoster {
    pub fn active_count(&self) -> i32 {
        self.members.len() as i32
    }

    /// Free slots left before the meeting completes.
    pub fn slots_left(&self) -> i32 {
        (self.meeting.fireteam_max - self.active_count()).max(0)
    }

    /// Membership ids of every annotated active member.
    pub fn membership_ids(&self) -> Vec<i64> {
        self.members
            .iter()
            .filter_map(|member| member.membership_id)
            .collect()
    }
}

/// Finds an active member by 1-based roster position or by Discord id.
///
/// Positions are tried first, so a short number always refers to a row of the roster.
///
/// # Arguments
/// - `members` - Active roster in display order
/// - `input` - Text typed by the leader, optionally a `<@id>` mention
///
/// # Returns
/// - `Some(user_id)` - Matching active member
/// - `None` - No roster row or member id matches
pub fn resolve_member_target(members: &[MeetingMember], input: &str) -> Option<u64> {
    let value = input
        .trim()
        .trim_start_matches("<@")
        .trim_start_matches('!')
        .trim_end_matches('>');
    let number = value.parse::<u64>().ok()?;

    if number >= 1 && number <= members.len() as u64 {
        return members.get(number as usize - 1).map(|member| member.user_id);
    }

    members
        .iter()
        .find(|member| member.user_id == number)
        .map(|member| member.user_id)
}

/// Parameters for creating a new meeting.
#[derive(Debug, Clone)]
pub struct CreateMeetingParams {
    pub channel_id: u64,
    pub author_id: u64,
    pub fireteam_max: i32,
    pub comment: Option<String>,
    /// Scheduled start. `None` creates an immediate meeting starting now.
    pub start_at: Option<DateTime<Utc>>,
}

/// What happened to the acting user in a join/leave toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// The user took a slot. `first_time` is set when they had no roster entry before.
    Joined { first_time: bool },
    Left,
}

/// Result of a successful join/leave toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipOutcome {
    pub meeting: Meeting,
    pub user_id: u64,
    pub change: MembershipChange,
    pub previous_status: MeetingStatus,
}

impl MembershipOutcome {
    /// The toggle filled the last slot.
    pub fn completed(&self) -> bool {
        self.previous_status == MeetingStatus::Active
            && self.meeting.status == MeetingStatus::Completed
    }

    /// A member left a meeting that was complete.
    pub fn reopened(&self) -> bool {
        self.previous_status == MeetingStatus::Completed
            && self.meeting.status == MeetingStatus::Active
    }
}

/// Result of kicking or banning a member.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalOutcome {
    pub meeting: Meeting,
    pub target_id: u64,
    /// `Kicked` or `Banned`.
    pub status: MemberStatus,
    pub reason: String,
    pub reopened: bool,
}

/// Result of changing the fireteam size.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeOutcome {
    pub meeting: Meeting,
    pub completed: bool,
}

/// Result of canceling a meeting.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelOutcome {
    pub meeting: Meeting,
    /// Active members other than the leader, to be told about the cancellation.
    pub recipients: Vec<u64>,
    pub reason: String,
}
