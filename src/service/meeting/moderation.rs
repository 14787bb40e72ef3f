use chrono::{DateTime, Utc};
use entity::{meeting::MeetingStatus, meeting_member::MemberStatus};
use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::{
    data::{
        meeting::{MeetingChange, MeetingRepository},
        meeting_member::MeetingMemberRepository,
    },
    error::{meeting::MeetingError, AppError},
    model::meeting::{resolve_member_target, RemovalOutcome},
    service::meeting::{
        complete_at_for, load_meeting, reload_meeting, require_leader, require_open, Attempt,
        MeetingService, MAX_ROSTER_ATTEMPTS,
    },
};

impl<'a> MeetingService<'a> {
    /// Kicks an active member out of the meeting. Kicked users may join again.
    ///
    /// # Arguments
    /// - `meeting_id` - Meeting to change
    /// - `actor_id` - Discord id of the leader
    /// - `target` - Roster position, user id or mention of the member
    /// - `reason` - Reason sent to the kicked user
    /// - `now` - Current time
    pub async fn kick(
        &self,
        meeting_id: i32,
        actor_id: u64,
        target: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<RemovalOutcome, AppError> {
        self.remove_member(meeting_id, actor_id, target, reason, MemberStatus::Kicked, now)
            .await
    }

    /// Bans an active member from the meeting. Banned users cannot join again.
    ///
    /// Arguments as for [`MeetingService::kick`].
    pub async fn ban(
        &self,
        meeting_id: i32,
        actor_id: u64,
        target: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<RemovalOutcome, AppError> {
        self.remove_member(meeting_id, actor_id, target, reason, MemberStatus::Banned, now)
            .await
    }

    async fn remove_member(
        &self,
        meeting_id: i32,
        actor_id: u64,
        target: &str,
        reason: &str,
        status: MemberStatus,
        now: DateTime<Utc>,
    ) -> Result<RemovalOutcome, AppError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(MeetingError::ReasonRequired.into());
        }

        for _ in 0..MAX_ROSTER_ATTEMPTS {
            let txn = self.db.begin().await?;

            match try_remove(&txn, meeting_id, actor_id, target, reason, status, now).await? {
                Attempt::Done(outcome) => {
                    txn.commit().await?;

                    tracing::info!(
                        "User {} set {} to {:?} in meeting {}: {}",
                        actor_id,
                        outcome.target_id,
                        status,
                        meeting_id,
                        reason
                    );

                    return Ok(outcome);
                }
                Attempt::Stale => txn.rollback().await?,
            }
        }

        Err(MeetingError::Conflict.into())
    }
}

async fn try_remove(
    txn: &DatabaseTransaction,
    meeting_id: i32,
    actor_id: u64,
    target: &str,
    reason: &str,
    status: MemberStatus,
    now: DateTime<Utc>,
) -> Result<Attempt<RemovalOutcome>, AppError> {
    let meeting = load_meeting(txn, meeting_id).await?;
    require_open(&meeting)?;
    require_leader(txn, meeting_id, actor_id).await?;

    let members = MeetingMemberRepository::new(txn);
    let active = members.get_active(meeting_id).await?;

    let target_id = resolve_member_target(&active, target)
        .ok_or_else(|| MeetingError::UnknownTarget(target.trim().to_string()))?;
    if target_id == actor_id || target_id == meeting.author_id {
        return Err(MeetingError::ForbiddenTarget.into());
    }
    let is_member = active
        .iter()
        .any(|member| member.user_id == target_id && member.status == MemberStatus::Member);
    if !is_member {
        return Err(MeetingError::TargetNotActive.into());
    }

    let remaining = active.len() as i32 - 1;
    let meeting_status = if remaining < meeting.fireteam_max {
        MeetingStatus::Active
    } else {
        meeting.status
    };
    let change = MeetingChange {
        status: meeting_status,
        complete_at: complete_at_for(&meeting, meeting_status, now),
        fireteam_max: None,
    };
    if !MeetingRepository::new(txn)
        .compare_and_set(meeting_id, meeting.roster_version, meeting.status, change)
        .await?
    {
        return Ok(Attempt::Stale);
    }

    members.set_status(meeting_id, target_id, status, now).await?;

    Ok(Attempt::Done(RemovalOutcome {
        meeting: reload_meeting(txn, meeting_id).await?,
        target_id,
        status,
        reason: reason.to_string(),
        reopened: meeting.status == MeetingStatus::Completed
            && meeting_status == MeetingStatus::Active,
    }))
}
