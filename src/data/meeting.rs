use chrono::{DateTime, Duration, Utc};
use entity::{meeting::MeetingStatus, meeting_member::MemberStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::model::meeting::{Meeting, MessageRef};

/// Fields written together with a roster version bump.
#[derive(Debug, Clone)]
pub struct MeetingChange {
    pub status: MeetingStatus,
    pub complete_at: Option<DateTime<Utc>>,
    /// New fireteam size, `None` keeps the current one.
    pub fireteam_max: Option<i32>,
}

pub struct MeetingRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MeetingRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new meeting.
    ///
    /// # Arguments
    /// - `channel_id` - Meeting channel the meeting belongs to
    /// - `author_id` - Discord id of the author, who becomes the leader
    /// - `fireteam_max` - Capacity including the leader
    /// - `comment` - Optional description
    /// - `planned` - Whether the meeting starts later
    /// - `start_at` - Start time; `actual_until` is six hours later
    /// - `status` - `Active`, or `Completed` when the leader alone fills the roster; a
    ///   completed meeting gets its creation time as `complete_at`
    ///
    /// # Returns
    /// - `Ok(Meeting)` - The created meeting
    /// - `Err(DbErr)` - Database error
    pub async fn create(
        &self,
        channel_id: u64,
        author_id: u64,
        fireteam_max: i32,
        comment: Option<String>,
        planned: bool,
        start_at: DateTime<Utc>,
        status: MeetingStatus,
    ) -> Result<Meeting, DbErr> {
        let created_at = Utc::now();
        let complete_at = (status == MeetingStatus::Completed).then_some(created_at);

        let meeting = entity::meeting::ActiveModel {
            channel_id: ActiveValue::Set(channel_id.to_string()),
            message_channel_id: ActiveValue::Set(None),
            message_id: ActiveValue::Set(None),
            status: ActiveValue::Set(status),
            planned: ActiveValue::Set(planned),
            author_id: ActiveValue::Set(author_id.to_string()),
            fireteam_max: ActiveValue::Set(fireteam_max),
            comment: ActiveValue::Set(comment),
            created_at: ActiveValue::Set(created_at),
            start_at: ActiveValue::Set(start_at),
            complete_at: ActiveValue::Set(complete_at),
            actual_until: ActiveValue::Set(start_at + Duration::hours(6)),
            roster_version: ActiveValue::Set(0),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Meeting::from_entity(meeting)
    }

    /// Gets a meeting by its id.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Meeting>, DbErr> {
        entity::prelude::Meeting::find_by_id(id)
            .one(self.db)
            .await?
            .map(Meeting::from_entity)
            .transpose()
    }

    /// Gets the meeting presented by a chat message.
    pub async fn find_by_message_id(&self, message_id: u64) -> Result<Option<Meeting>, DbErr> {
        entity::prelude::Meeting::find()
            .filter(entity::meeting::Column::MessageId.eq(message_id.to_string()))
            .one(self.db)
            .await?
            .map(Meeting::from_entity)
            .transpose()
    }

    /// Stores where the meeting's message was posted.
    pub async fn set_message(&self, id: i32, message: MessageRef) -> Result<(), DbErr> {
        entity::prelude::Meeting::update_many()
            .set(entity::meeting::ActiveModel {
                message_channel_id: ActiveValue::Set(Some(message.channel_id.to_string())),
                message_id: ActiveValue::Set(Some(message.message_id.to_string())),
                ..Default::default()
            })
            .filter(entity::meeting::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Applies a change only if the meeting is still at the observed version and status.
    ///
    /// Every roster mutation goes through this update so that two concurrent writers reading
    /// the same version cannot both succeed.
    ///
    /// # Arguments
    /// - `id` - Meeting id
    /// - `expected_version` - `roster_version` read before validating the change
    /// - `expected_status` - Status read before validating the change
    /// - `change` - Fields to write
    ///
    /// # Returns
    /// - `Ok(true)` - Change applied, version incremented
    /// - `Ok(false)` - Meeting changed in between, nothing written
    /// - `Err(DbErr)` - Database error
    pub async fn compare_and_set(
        &self,
        id: i32,
        expected_version: i32,
        expected_status: MeetingStatus,
        change: MeetingChange,
    ) -> Result<bool, DbErr> {
        let fireteam_max = match change.fireteam_max {
            Some(size) => ActiveValue::Set(size),
            None => ActiveValue::NotSet,
        };

        let result = entity::prelude::Meeting::update_many()
            .set(entity::meeting::ActiveModel {
                status: ActiveValue::Set(change.status),
                complete_at: ActiveValue::Set(change.complete_at),
                fireteam_max,
                roster_version: ActiveValue::Set(expected_version + 1),
                ..Default::default()
            })
            .filter(entity::meeting::Column::Id.eq(id))
            .filter(entity::meeting::Column::RosterVersion.eq(expected_version))
            .filter(entity::meeting::Column::Status.eq(expected_status))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Updates the meeting description.
    pub async fn set_comment(&self, id: i32, comment: Option<String>) -> Result<(), DbErr> {
        entity::prelude::Meeting::update_many()
            .set(entity::meeting::ActiveModel {
                comment: ActiveValue::Set(comment),
                ..Default::default()
            })
            .filter(entity::meeting::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Moves an open meeting into a terminal status.
    ///
    /// # Arguments
    /// - `id` - Meeting id
    /// - `from` - Statuses the meeting may currently be in
    /// - `to` - Terminal status to write
    ///
    /// # Returns
    /// - `Ok(true)` - The meeting was in one of `from` and is now `to`
    /// - `Ok(false)` - The meeting was in another status, nothing written
    /// - `Err(DbErr)` - Database error
    pub async fn close(
        &self,
        id: i32,
        from: &[MeetingStatus],
        to: MeetingStatus,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::Meeting::update_many()
            .set(entity::meeting::ActiveModel {
                status: ActiveValue::Set(to),
                ..Default::default()
            })
            .filter(entity::meeting::Column::Id.eq(id))
            .filter(entity::meeting::Column::Status.is_in(from.iter().copied()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Applies the expiry transition to one meeting.
    ///
    /// Active meetings become `DeletedByOverdue` and completed ones `DeletedByCompleted`, both
    /// only when `actual_until` has passed. Running it again is a no-op.
    ///
    /// # Arguments
    /// - `id` - Meeting id
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(true)` - The meeting was closed by this call
    /// - `Ok(false)` - Not due yet or already terminal
    /// - `Err(DbErr)` - Database error
    pub async fn expire(&self, id: i32, now: DateTime<Utc>) -> Result<bool, DbErr> {
        let mut changed = 0;

        for (from, to) in [
            (MeetingStatus::Active, MeetingStatus::DeletedByOverdue),
            (MeetingStatus::Completed, MeetingStatus::DeletedByCompleted),
        ] {
            let result = entity::prelude::Meeting::update_many()
                .set(entity::meeting::ActiveModel {
                    status: ActiveValue::Set(to),
                    ..Default::default()
                })
                .filter(entity::meeting::Column::Id.eq(id))
                .filter(entity::meeting::Column::Status.eq(from))
                .filter(entity::meeting::Column::ActualUntil.lte(now))
                .exec(self.db)
                .await?;
            changed += result.rows_affected;
        }

        Ok(changed > 0)
    }

    /// Finds open meetings whose deadline falls before `horizon`.
    ///
    /// # Returns
    /// - `Ok(Vec<(id, actual_until)>)` - Candidates ordered by deadline
    /// - `Err(DbErr)` - Database error
    pub async fn find_expiring_before(
        &self,
        horizon: DateTime<Utc>,
    ) -> Result<Vec<(i32, DateTime<Utc>)>, DbErr> {
        let meetings = entity::prelude::Meeting::find()
            .filter(entity::meeting::Column::Status.is_in(MeetingStatus::OPEN))
            .filter(entity::meeting::Column::ActualUntil.lte(horizon))
            .order_by_asc(entity::meeting::Column::ActualUntil)
            .all(self.db)
            .await?;

        Ok(meetings
            .into_iter()
            .map(|meeting| (meeting.id, meeting.actual_until))
            .collect())
    }

    /// Finds open meetings the user is active in that start within a window.
    ///
    /// # Arguments
    /// - `user_id` - Discord user id
    /// - `from` - Window start (inclusive)
    /// - `to` - Window end (inclusive)
    ///
    /// # Returns
    /// - `Ok(Vec<Meeting>)` - Matching meetings ordered by start time
    /// - `Err(DbErr)` - Database error
    pub async fn find_open_for_user_between(
        &self,
        user_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Meeting>, DbErr> {
        entity::prelude::Meeting::find()
            .join(
                JoinType::InnerJoin,
                entity::meeting::Relation::MeetingMember.def(),
            )
            .filter(entity::meeting_member::Column::UserId.eq(user_id.to_string()))
            .filter(entity::meeting_member::Column::Status.is_in(MemberStatus::ACTIVE))
            .filter(entity::meeting::Column::Status.is_in(MeetingStatus::OPEN))
            .filter(entity::meeting::Column::StartAt.between(from, to))
            .order_by_asc(entity::meeting::Column::StartAt)
            .all(self.db)
            .await?
            .into_iter()
            .map(Meeting::from_entity)
            .collect()
    }
}
