use chrono::{DateTime, Utc};

use crate::{
    data::meeting::MeetingRepository,
    error::AppError,
    model::meeting::Meeting,
    service::meeting::{reload_meeting, MeetingService},
};

impl<'a> MeetingService<'a> {
    /// Closes a meeting whose `actual_until` deadline has passed.
    ///
    /// Safe to call any number of times: only the first call after the deadline changes the
    /// meeting.
    ///
    /// # Arguments
    /// - `meeting_id` - Meeting whose deadline fired
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(Some(Meeting))` - The meeting was closed by this call
    /// - `Ok(None)` - Not due, already closed or deleted
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn expire(
        &self,
        meeting_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<Meeting>, AppError> {
        if !MeetingRepository::new(self.db).expire(meeting_id, now).await? {
            return Ok(None);
        }

        let meeting = reload_meeting(self.db, meeting_id).await?;
        tracing::info!("Meeting {} expired as {:?}", meeting_id, meeting.status);

        Ok(Some(meeting))
    }

    /// Lists open meetings due before `horizon` with their deadlines.
    pub async fn find_expiring_before(
        &self,
        horizon: DateTime<Utc>,
    ) -> Result<Vec<(i32, DateTime<Utc>)>, AppError> {
        Ok(MeetingRepository::new(self.db)
            .find_expiring_before(horizon)
            .await?)
    }
}
