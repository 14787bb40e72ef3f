use chrono::{DateTime, Utc};
use entity::meeting::MeetingStatus;
use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::{
    data::{
        meeting::{MeetingChange, MeetingRepository},
        meeting_channel::MeetingChannelRepository,
        meeting_member::MeetingMemberRepository,
    },
    error::{meeting::MeetingError, AppError},
    model::meeting::ResizeOutcome,
    service::meeting::{
        complete_at_for, load_meeting, reload_meeting, require_leader, require_open, Attempt,
        MeetingService, MAX_ROSTER_ATTEMPTS,
    },
};

/// Status a meeting takes after resizing to `new_size`.
///
/// # Arguments
/// - `new_size` - Requested fireteam size
/// - `active` - Number of active members (leader included)
/// - `channel_max` - Largest size the meeting channel allows
///
/// # Returns
/// - `Ok(MeetingStatus)` - `Completed` when the roster exactly fills the new size
/// - `Err(MeetingError)` - The size is not allowed
pub fn plan_resize(
    new_size: i32,
    active: i32,
    channel_max: i32,
) -> Result<MeetingStatus, MeetingError> {
    if new_size < 1 {
        return Err(MeetingError::SizeTooSmall);
    }
    if new_size > channel_max {
        return Err(MeetingError::SizeAboveMax { max: channel_max });
    }
    if new_size < active {
        return Err(MeetingError::SizeBelowActive { active });
    }

    if new_size == active {
        Ok(MeetingStatus::Completed)
    } else {
        Ok(MeetingStatus::Active)
    }
}

impl<'a> MeetingService<'a> {
    /// Changes the fireteam size of a meeting.
    ///
    /// # Arguments
    /// - `meeting_id` - Meeting to change
    /// - `actor_id` - Discord id of the leader
    /// - `new_size` - Requested size including the leader
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(ResizeOutcome)` - New size stored; `completed` when it just filled the meeting
    /// - `Err(AppError::MeetingErr)` - Size not allowed or not the leader
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn resize(
        &self,
        meeting_id: i32,
        actor_id: u64,
        new_size: i32,
        now: DateTime<Utc>,
    ) -> Result<ResizeOutcome, AppError> {
        for _ in 0..MAX_ROSTER_ATTEMPTS {
            let txn = self.db.begin().await?;

            match try_resize(&txn, meeting_id, actor_id, new_size, now).await? {
                Attempt::Done(outcome) => {
                    txn.commit().await?;

                    tracing::info!(
                        "Meeting {} resized to {} by {} ({:?})",
                        meeting_id,
                        new_size,
                        actor_id,
                        outcome.meeting.status
                    );

                    return Ok(outcome);
                }
                Attempt::Stale => txn.rollback().await?,
            }
        }

        Err(MeetingError::Conflict.into())
    }
}

async fn try_resize(
    txn: &DatabaseTransaction,
    meeting_id: i32,
    actor_id: u64,
    new_size: i32,
    now: DateTime<Utc>,
) -> Result<Attempt<ResizeOutcome>, AppError> {
    let meeting = load_meeting(txn, meeting_id).await?;
    require_open(&meeting)?;
    require_leader(txn, meeting_id, actor_id).await?;

    let channel = MeetingChannelRepository::new(txn)
        .find_by_channel_id(meeting.channel_id)
        .await?
        .ok_or(MeetingError::ChannelNotConfigured)?;
    let active = MeetingMemberRepository::new(txn)
        .count_active(meeting_id)
        .await?;

    let status = plan_resize(new_size, active, channel.max_members_count)?;
    let change = MeetingChange {
        status,
        complete_at: complete_at_for(&meeting, status, now),
        fireteam_max: Some(new_size),
    };
    if !MeetingRepository::new(txn)
        .compare_and_set(meeting_id, meeting.roster_version, meeting.status, change)
        .await?
    {
        return Ok(Attempt::Stale);
    }

    Ok(Attempt::Done(ResizeOutcome {
        meeting: reload_meeting(txn, meeting_id).await?,
        completed: status == MeetingStatus::Completed && meeting.status != MeetingStatus::Completed,
    }))
}
