use entity::meeting::MeetingStatus;

use crate::{
    data::{meeting::MeetingRepository, meeting_member::MeetingMemberRepository},
    error::{meeting::MeetingError, AppError},
    model::meeting::{CancelOutcome, Meeting},
    service::meeting::{
        load_meeting, reload_meeting, require_leader, require_open, validate_comment,
        MeetingService,
    },
};

impl<'a> MeetingService<'a> {
    /// Cancels an open meeting.
    ///
    /// The status change is a single predicated update, so a meeting that expired or was
    /// canceled concurrently is reported as over instead of being overwritten.
    ///
    /// # Arguments
    /// - `meeting_id` - Meeting to cancel
    /// - `actor_id` - Discord id of the leader
    /// - `reason` - Reason sent to the other members
    ///
    /// # Returns
    /// - `Ok(CancelOutcome)` - Canceled meeting and the members to inform
    /// - `Err(AppError::MeetingErr)` - Not the leader, no reason or meeting already over
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn cancel(
        &self,
        meeting_id: i32,
        actor_id: u64,
        reason: &str,
    ) -> Result<CancelOutcome, AppError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(MeetingError::ReasonRequired.into());
        }

        let meeting = load_meeting(self.db, meeting_id).await?;
        require_open(&meeting)?;
        require_leader(self.db, meeting_id, actor_id).await?;

        let recipients = MeetingMemberRepository::new(self.db)
            .get_active(meeting_id)
            .await?
            .into_iter()
            .map(|member| member.user_id)
            .filter(|user_id| *user_id != actor_id)
            .collect();

        if !MeetingRepository::new(self.db)
            .close(meeting_id, &MeetingStatus::OPEN, MeetingStatus::Canceled)
            .await?
        {
            return Err(MeetingError::MeetingOver.into());
        }

        tracing::info!("Meeting {} canceled by {}: {}", meeting_id, actor_id, reason);

        Ok(CancelOutcome {
            meeting: reload_meeting(self.db, meeting_id).await?,
            recipients,
            reason: reason.to_string(),
        })
    }

    /// Replaces the description of a meeting. An empty text removes it.
    ///
    /// # Arguments
    /// - `meeting_id` - Meeting to change
    /// - `actor_id` - Discord id of the leader
    /// - `text` - New description
    pub async fn change_description(
        &self,
        meeting_id: i32,
        actor_id: u64,
        text: &str,
    ) -> Result<Meeting, AppError> {
        let comment = validate_comment(Some(text.to_string()))?;

        let meeting = load_meeting(self.db, meeting_id).await?;
        require_open(&meeting)?;
        require_leader(self.db, meeting_id, actor_id).await?;

        MeetingRepository::new(self.db)
            .set_comment(meeting_id, comment)
            .await?;

        reload_meeting(self.db, meeting_id).await
    }
}
