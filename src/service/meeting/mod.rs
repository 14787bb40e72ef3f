//! Meeting lifecycle engine.
//!
//! `MeetingService` owns every transition of a meeting and its roster. Each operation re-reads
//! the meeting before validating and writes through a compare-and-set on `roster_version`, so
//! concurrent button presses can never push the roster past `fireteam_max`. Side effects such
//! as re-rendering and direct messages are left to `MeetingNotificationService`.

pub mod annotation;
pub mod cancel;
pub mod expiry;
pub mod leader;
pub mod membership;
pub mod moderation;
pub mod notify;
pub mod resize;

#[cfg(test)]
mod test;

use chrono::{DateTime, Duration, Utc};
use entity::{meeting::MeetingStatus, meeting_member::MemberStatus};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    data::{
        meeting::MeetingRepository, meeting_channel::MeetingChannelRepository,
        meeting_member::MeetingMemberRepository,
    },
    error::{internal::InternalError, meeting::MeetingError, AppError},
    model::meeting::{CreateMeetingParams, Meeting, MeetingRoster, MessageRef},
};

/// Longest description a meeting may carry, in characters.
pub const MAX_COMMENT_LENGTH: usize = 255;

/// Meetings of the same user starting this close to each other need confirmation.
pub const OVERLAP_WINDOW_HOURS: i64 = 2;

/// Attempts made for a roster change before reporting a conflict to the user.
const MAX_ROSTER_ATTEMPTS: usize = 3;

pub struct MeetingService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MeetingService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a meeting with its author seated as leader.
    ///
    /// Meetings without a start time start immediately; meetings with one are planned and
    /// posted to the channel's planned channel. The leader occupies a slot, so a meeting
    /// for one is completed as soon as it is created.
    ///
    /// # Arguments
    /// - `params` - Creation parameters from the meeting form
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(Meeting)` - The created, not yet published meeting
    /// - `Err(AppError::MeetingErr)` - Channel not configured, bad size or description
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn create(
        &self,
        params: CreateMeetingParams,
        now: DateTime<Utc>,
    ) -> Result<Meeting, AppError> {
        let channel = MeetingChannelRepository::new(self.db)
            .find_by_channel_id(params.channel_id)
            .await?
            .ok_or(MeetingError::ChannelNotConfigured)?;

        if params.fireteam_max < 1 {
            return Err(MeetingError::SizeTooSmall.into());
        }
        if params.fireteam_max > channel.max_members_count {
            return Err(MeetingError::SizeAboveMax {
                max: channel.max_members_count,
            }
            .into());
        }
        let comment = validate_comment(params.comment)?;

        let planned = params.start_at.is_some();
        let start_at = params.start_at.unwrap_or(now);
        let status = if params.fireteam_max == 1 {
            MeetingStatus::Completed
        } else {
            MeetingStatus::Active
        };

        let txn = self.db.begin().await?;
        let meeting = MeetingRepository::new(&txn)
            .create(
                params.channel_id,
                params.author_id,
                params.fireteam_max,
                comment,
                planned,
                start_at,
                status,
            )
            .await?;
        MeetingMemberRepository::new(&txn)
            .set_status(meeting.id, params.author_id, MemberStatus::Leader, now)
            .await?;
        txn.commit().await?;

        tracing::info!(
            "Meeting {} created by {} in channel {} ({} slots, starts {})",
            meeting.id,
            params.author_id,
            channel.name,
            meeting.fireteam_max,
            meeting.start_at
        );

        Ok(meeting)
    }

    /// Gets a meeting by id.
    pub async fn get(&self, meeting_id: i32) -> Result<Meeting, AppError> {
        Ok(MeetingRepository::new(self.db)
            .find_by_id(meeting_id)
            .await?
            .ok_or(MeetingError::NotFound)?)
    }

    /// Gets the meeting presented by a chat message.
    pub async fn get_by_message(&self, message_id: u64) -> Result<Meeting, AppError> {
        Ok(MeetingRepository::new(self.db)
            .find_by_message_id(message_id)
            .await?
            .ok_or(MeetingError::NotFound)?)
    }

    /// Reads a meeting together with its channel and active roster.
    ///
    /// # Returns
    /// - `Ok(Some(MeetingRoster))` - Current persisted state
    /// - `Ok(None)` - Meeting or its channel does not exist
    /// - `Err(DbErr)` - Database error
    pub async fn get_roster(&self, meeting_id: i32) -> Result<Option<MeetingRoster>, AppError> {
        let Some(meeting) = MeetingRepository::new(self.db).find_by_id(meeting_id).await? else {
            return Ok(None);
        };
        let Some(channel) = MeetingChannelRepository::new(self.db)
            .find_by_channel_id(meeting.channel_id)
            .await?
        else {
            return Ok(None);
        };
        let members = MeetingMemberRepository::new(self.db)
            .get_active(meeting_id)
            .await?;

        Ok(Some(MeetingRoster {
            meeting,
            channel,
            members,
        }))
    }

    /// Finds open meetings the user takes part in that start close to `start_at`.
    pub async fn find_overlapping(
        &self,
        user_id: u64,
        start_at: DateTime<Utc>,
    ) -> Result<Vec<Meeting>, AppError> {
        let window = Duration::hours(OVERLAP_WINDOW_HOURS);

        Ok(MeetingRepository::new(self.db)
            .find_open_for_user_between(user_id, start_at - window, start_at + window)
            .await?)
    }

    /// Records where a meeting was published.
    pub async fn attach_message(&self, meeting_id: i32, message: MessageRef) -> Result<(), AppError> {
        MeetingRepository::new(self.db)
            .set_message(meeting_id, message)
            .await?;

        Ok(())
    }

    /// Handles the deletion of a chat message by someone other than the bot.
    ///
    /// Only an active meeting moves to `DeletedByOtherUser`. Meetings the bot closed itself are
    /// already terminal when their message disappears, so the update does nothing for them.
    ///
    /// # Arguments
    /// - `message_id` - Deleted message
    ///
    /// # Returns
    /// - `Ok(Some(Meeting))` - The meeting that was closed
    /// - `Ok(None)` - The message did not present an active meeting
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn handle_message_deleted(&self, message_id: u64) -> Result<Option<Meeting>, AppError> {
        let repo = MeetingRepository::new(self.db);
        let Some(meeting) = repo.find_by_message_id(message_id).await? else {
            return Ok(None);
        };

        if !repo
            .close(
                meeting.id,
                &[MeetingStatus::Active],
                MeetingStatus::DeletedByOtherUser,
            )
            .await?
        {
            return Ok(None);
        }

        tracing::info!(
            "Meeting {} closed because its message {} was deleted",
            meeting.id,
            message_id
        );

        Ok(repo.find_by_id(meeting.id).await?)
    }

    /// Gets the current leader of a meeting.
    pub async fn leader_of(&self, meeting_id: i32) -> Result<Option<u64>, AppError> {
        let members = MeetingMemberRepository::new(self.db)
            .get_active(meeting_id)
            .await?;

        Ok(members
            .into_iter()
            .find(|member| member.status == MemberStatus::Leader)
            .map(|member| member.user_id))
    }
}

/// Result of one optimistic attempt at a roster change.
enum Attempt<T> {
    Done(T),
    /// The meeting moved on since it was read; retry with fresh state.
    Stale,
}

/// Ensures the acting user currently leads the meeting.
async fn require_leader<C: ConnectionTrait>(
    db: &C,
    meeting_id: i32,
    actor_id: u64,
) -> Result<(), AppError> {
    let member = MeetingMemberRepository::new(db)
        .find(meeting_id, actor_id)
        .await?;

    match member {
        Some(member) if member.status == MemberStatus::Leader => Ok(()),
        _ => Err(MeetingError::NotLeader.into()),
    }
}

/// Reads a meeting inside a running operation.
async fn load_meeting<C: ConnectionTrait>(db: &C, meeting_id: i32) -> Result<Meeting, AppError> {
    Ok(MeetingRepository::new(db)
        .find_by_id(meeting_id)
        .await?
        .ok_or(MeetingError::NotFound)?)
}

/// Re-reads a meeting right after this operation changed it.
async fn reload_meeting<C: ConnectionTrait>(db: &C, meeting_id: i32) -> Result<Meeting, AppError> {
    Ok(MeetingRepository::new(db)
        .find_by_id(meeting_id)
        .await?
        .ok_or(InternalError::MeetingVanished(meeting_id))?)
}

/// Ensures the meeting can still change.
fn require_open(meeting: &Meeting) -> Result<(), MeetingError> {
    if meeting.status.is_terminal() {
        return Err(MeetingError::MeetingOver);
    }

    Ok(())
}

/// `complete_at` to store when a meeting moves into `status`.
fn complete_at_for(
    meeting: &Meeting,
    status: MeetingStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match status {
        MeetingStatus::Completed => meeting.complete_at.or(Some(now)),
        _ => None,
    }
}

/// Normalises a description typed by the user.
fn validate_comment(comment: Option<String>) -> Result<Option<String>, MeetingError> {
    let comment = comment
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    if let Some(text) = &comment {
        if text.chars().count() > MAX_COMMENT_LENGTH {
            return Err(MeetingError::DescriptionTooLong {
                max: MAX_COMMENT_LENGTH,
            });
        }
    }

    Ok(comment)
}
