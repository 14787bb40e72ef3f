use chrono::{DateTime, Utc};
use entity::{meeting::MeetingStatus, meeting_member::MemberStatus};
use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::{
    data::{
        meeting::{MeetingChange, MeetingRepository},
        meeting_member::MeetingMemberRepository,
    },
    error::{meeting::MeetingError, AppError},
    model::meeting::{MembershipChange, MembershipOutcome},
    service::meeting::{
        complete_at_for, load_meeting, reload_meeting, Attempt, MeetingService,
        MAX_ROSTER_ATTEMPTS,
    },
};

/// Writes a join/leave toggle resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TogglePlan {
    pub member_status: MemberStatus,
    pub meeting_status: MeetingStatus,
    pub change: MembershipChange,
}

/// Decides what a join/leave press does, given freshly read state.
///
/// # Arguments
/// - `meeting_status` - Current meeting status
/// - `member_status` - Current status of the acting user, `None` if they never joined
/// - `active` - Number of active members (leader included)
/// - `fireteam_max` - Meeting capacity
///
/// # Returns
/// - `Ok(TogglePlan)` - Statuses to write
/// - `Err(MeetingError)` - The press is rejected
pub fn plan_toggle(
    meeting_status: MeetingStatus,
    member_status: Option<MemberStatus>,
    active: i32,
    fireteam_max: i32,
) -> Result<TogglePlan, MeetingError> {
    if meeting_status.is_terminal() {
        return Err(MeetingError::MeetingOver);
    }

    match member_status {
        Some(MemberStatus::Leader) => Err(MeetingError::LeaderCannotLeave),
        Some(MemberStatus::Banned) => Err(MeetingError::UserBanned),
        Some(MemberStatus::Member) => Ok(TogglePlan {
            member_status: MemberStatus::Left,
            meeting_status: MeetingStatus::Active,
            change: MembershipChange::Left,
        }),
        _ => {
            if meeting_status == MeetingStatus::Completed || active >= fireteam_max {
                return Err(MeetingError::MeetingFull);
            }

            let meeting_status = if active + 1 >= fireteam_max {
                MeetingStatus::Completed
            } else {
                MeetingStatus::Active
            };

            Ok(TogglePlan {
                member_status: MemberStatus::Member,
                meeting_status,
                change: MembershipChange::Joined {
                    first_time: member_status.is_none(),
                },
            })
        }
    }
}

impl<'a> MeetingService<'a> {
    /// Joins or leaves a meeting for the acting user.
    ///
    /// The roster is re-read and the change validated inside a transaction whose meeting
    /// update only applies at the observed `roster_version`. A lost race is retried with
    /// fresh state a few times before the user is asked to try again.
    ///
    /// # Arguments
    /// - `meeting_id` - Meeting to toggle
    /// - `user_id` - Discord id of the user who pressed the button
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(MembershipOutcome)` - Committed change and the meeting after it
    /// - `Err(AppError::MeetingErr)` - Rejected, or `Conflict` after repeated races
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn toggle_membership(
        &self,
        meeting_id: i32,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> Result<MembershipOutcome, AppError> {
        for _ in 0..MAX_ROSTER_ATTEMPTS {
            let txn = self.db.begin().await?;

            match try_toggle(&txn, meeting_id, user_id, now).await? {
                Attempt::Done(outcome) => {
                    txn.commit().await?;

                    tracing::info!(
                        "User {} {:?} meeting {} ({:?} -> {:?})",
                        user_id,
                        outcome.change,
                        meeting_id,
                        outcome.previous_status,
                        outcome.meeting.status
                    );

                    return Ok(outcome);
                }
                Attempt::Stale => {
                    txn.rollback().await?;
                    tracing::debug!("Roster of meeting {} changed concurrently, retrying", meeting_id);
                }
            }
        }

        Err(MeetingError::Conflict.into())
    }
}

async fn try_toggle(
    txn: &DatabaseTransaction,
    meeting_id: i32,
    user_id: u64,
    now: DateTime<Utc>,
) -> Result<Attempt<MembershipOutcome>, AppError> {
    let meeting = load_meeting(txn, meeting_id).await?;
    let members = MeetingMemberRepository::new(txn);

    let member = members.find(meeting_id, user_id).await?;
    let active = members.count_active(meeting_id).await?;
    let plan = plan_toggle(
        meeting.status,
        member.map(|member| member.status),
        active,
        meeting.fireteam_max,
    )?;

    let change = MeetingChange {
        status: plan.meeting_status,
        complete_at: complete_at_for(&meeting, plan.meeting_status, now),
        fireteam_max: None,
    };
    if !MeetingRepository::new(txn)
        .compare_and_set(meeting_id, meeting.roster_version, meeting.status, change)
        .await?
    {
        return Ok(Attempt::Stale);
    }

    members
        .set_status(meeting_id, user_id, plan.member_status, now)
        .await?;

    Ok(Attempt::Done(MembershipOutcome {
        meeting: reload_meeting(txn, meeting_id).await?,
        user_id,
        change: plan.change,
        previous_status: meeting.status,
    }))
}
