//! Meeting factory for creating test meeting entities.

use crate::factory::helpers::next_snowflake;
use chrono::{DateTime, Duration, Utc};
use entity::meeting::MeetingStatus;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test meetings with customizable fields.
///
/// The factory only writes the meeting row. Roster entries, including the leader, are created
/// separately with the `meeting_member` factory.
///
/// # Example
///
/// ```rust,ignore
/// let meeting = MeetingFactory::new(&db, &channel.channel_id, "1001")
///     .fireteam_max(2)
///     .status(MeetingStatus::Completed)
///     .build()
///     .await?;
/// ```
pub struct MeetingFactory<'a> {
    db: &'a DatabaseConnection,
    channel_id: String,
    author_id: String,
    status: MeetingStatus,
    planned: bool,
    fireteam_max: i32,
    comment: Option<String>,
    start_at: DateTime<Utc>,
    actual_until: DateTime<Utc>,
    message_id: Option<String>,
}

impl<'a> MeetingFactory<'a> {
    /// Creates a new MeetingFactory with default values.
    ///
    /// Defaults:
    /// - status: `Active`
    /// - fireteam_max: `3`
    /// - start_at: 1 hour from now
    /// - actual_until: 7 hours from now
    /// - a posted message id
    pub fn new(
        db: &'a DatabaseConnection,
        channel_id: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        let start_at = Utc::now() + Duration::hours(1);
        Self {
            db,
            channel_id: channel_id.into(),
            author_id: author_id.into(),
            status: MeetingStatus::Active,
            planned: false,
            fireteam_max: 3,
            comment: None,
            start_at,
            actual_until: start_at + Duration::hours(6),
            message_id: Some(next_snowflake()),
        }
    }

    pub fn status(mut self, status: MeetingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn planned(mut self, planned: bool) -> Self {
        self.planned = planned;
        self
    }

    pub fn fireteam_max(mut self, fireteam_max: i32) -> Self {
        self.fireteam_max = fireteam_max;
        self
    }

    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// Sets the start time and moves `actual_until` to six hours after it.
    pub fn start_at(mut self, start_at: DateTime<Utc>) -> Self {
        self.start_at = start_at;
        self.actual_until = start_at + Duration::hours(6);
        self
    }

    pub fn actual_until(mut self, actual_until: DateTime<Utc>) -> Self {
        self.actual_until = actual_until;
        self
    }

    pub fn message_id(mut self, message_id: Option<String>) -> Self {
        self.message_id = message_id;
        self
    }

    /// Inserts the meeting into the database.
    ///
    /// # Returns
    /// - `Ok(Model)` - Created meeting
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::meeting::Model, DbErr> {
        let now = Utc::now();
        let complete_at = (self.status == MeetingStatus::Completed).then_some(now);
        let message_channel_id = self.message_id.as_ref().map(|_| self.channel_id.clone());

        entity::meeting::ActiveModel {
            channel_id: ActiveValue::Set(self.channel_id),
            message_channel_id: ActiveValue::Set(message_channel_id),
            message_id: ActiveValue::Set(self.message_id),
            status: ActiveValue::Set(self.status),
            planned: ActiveValue::Set(self.planned),
            author_id: ActiveValue::Set(self.author_id),
            fireteam_max: ActiveValue::Set(self.fireteam_max),
            comment: ActiveValue::Set(self.comment),
            created_at: ActiveValue::Set(now),
            start_at: ActiveValue::Set(self.start_at),
            complete_at: ActiveValue::Set(complete_at),
            actual_until: ActiveValue::Set(self.actual_until),
            roster_version: ActiveValue::Set(0),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active meeting with default values.
pub async fn create_meeting(
    db: &DatabaseConnection,
    channel_id: &str,
    author_id: &str,
) -> Result<entity::meeting::Model, DbErr> {
    MeetingFactory::new(db, channel_id, author_id).build().await
}
