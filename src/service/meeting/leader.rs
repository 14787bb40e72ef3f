use chrono::{DateTime, Utc};
use entity::meeting_member::MemberStatus;
use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::{
    data::{
        meeting::{MeetingChange, MeetingRepository},
        meeting_member::MeetingMemberRepository,
    },
    error::{meeting::MeetingError, AppError},
    model::meeting::{resolve_member_target, Meeting},
    service::meeting::{
        load_meeting, reload_meeting, require_leader, require_open, Attempt, MeetingService,
        MAX_ROSTER_ATTEMPTS,
    },
};

/// Leadership handed from one member to another.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderTransfer {
    pub meeting: Meeting,
    pub previous_leader_id: u64,
    pub new_leader_id: u64,
}

impl<'a> MeetingService<'a> {
    /// Makes another active member the leader of the meeting.
    ///
    /// Both roster rows change in one transaction. If either statement does not hit exactly
    /// one row the transaction is rolled back, so the meeting always keeps a single leader.
    ///
    /// # Arguments
    /// - `meeting_id` - Meeting to change
    /// - `actor_id` - Discord id of the current leader
    /// - `target` - Roster position, user id or mention of the new leader
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(LeaderTransfer)` - Leadership moved
    /// - `Err(AppError::MeetingErr(TransferFailed))` - Roster rows did not match, nothing changed
    /// - `Err(AppError::MeetingErr)` - Other rejections
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn transfer_leadership(
        &self,
        meeting_id: i32,
        actor_id: u64,
        target: &str,
        now: DateTime<Utc>,
    ) -> Result<LeaderTransfer, AppError> {
        for _ in 0..MAX_ROSTER_ATTEMPTS {
            let txn = self.db.begin().await?;

            match try_transfer(&txn, meeting_id, actor_id, target, now).await? {
                Attempt::Done(transfer) => {
                    txn.commit().await?;

                    tracing::info!(
                        "Leadership of meeting {} moved from {} to {}",
                        meeting_id,
                        transfer.previous_leader_id,
                        transfer.new_leader_id
                    );

                    return Ok(transfer);
                }
                Attempt::Stale => txn.rollback().await?,
            }
        }

        Err(MeetingError::Conflict.into())
    }
}

async fn try_transfer(
    txn: &DatabaseTransaction,
    meeting_id: i32,
    actor_id: u64,
    target: &str,
    now: DateTime<Utc>,
) -> Result<Attempt<LeaderTransfer>, AppError> {
    let meeting = load_meeting(txn, meeting_id).await?;
    require_open(&meeting)?;
    require_leader(txn, meeting_id, actor_id).await?;

    let members = MeetingMemberRepository::new(txn);
    let active = members.get_active(meeting_id).await?;
    let target_id = resolve_member_target(&active, target)
        .ok_or_else(|| MeetingError::UnknownTarget(target.trim().to_string()))?;
    if target_id == actor_id {
        return Err(MeetingError::ForbiddenTarget.into());
    }

    let change = MeetingChange {
        status: meeting.status,
        complete_at: meeting.complete_at,
        fireteam_max: None,
    };
    if !MeetingRepository::new(txn)
        .compare_and_set(meeting_id, meeting.roster_version, meeting.status, change)
        .await?
    {
        return Ok(Attempt::Stale);
    }

    let demoted = members
        .transition(meeting_id, actor_id, MemberStatus::Leader, MemberStatus::Member, now)
        .await?;
    let promoted = members
        .transition(meeting_id, target_id, MemberStatus::Member, MemberStatus::Leader, now)
        .await?;
    if demoted != 1 || promoted != 1 {
        tracing::warn!(
            "Leadership transfer in meeting {} touched {} leader and {} member rows, rolling back",
            meeting_id,
            demoted,
            promoted
        );
        return Err(MeetingError::TransferFailed.into());
    }

    Ok(Attempt::Done(LeaderTransfer {
        meeting: reload_meeting(txn, meeting_id).await?,
        previous_leader_id: actor_id,
        new_leader_id: target_id,
    }))
}
