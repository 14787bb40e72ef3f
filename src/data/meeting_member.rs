use chrono::{DateTime, Utc};
use entity::meeting_member::MemberStatus;
use sea_orm::{
    sea_query::OnConflict, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::model::{bungie::PlayerProfile, meeting::MeetingMember};

pub struct MeetingMemberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MeetingMemberRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets a user's roster entry for a meeting.
    ///
    /// # Returns
    /// - `Ok(Some(MeetingMember))` - The user has an entry in any status
    /// - `Ok(None)` - The user never interacted with the meeting
    /// - `Err(DbErr)` - Database error
    pub async fn find(&self, meeting_id: i32, user_id: u64) -> Result<Option<MeetingMember>, DbErr> {
        entity::prelude::MeetingMember::find_by_id((meeting_id, user_id.to_string()))
            .one(self.db)
            .await?
            .map(MeetingMember::from_entity)
            .transpose()
    }

    /// Gets the active roster of a meeting, leader first, then in order of joining.
    pub async fn get_active(&self, meeting_id: i32) -> Result<Vec<MeetingMember>, DbErr> {
        let mut members = entity::prelude::MeetingMember::find()
            .filter(entity::meeting_member::Column::MeetingId.eq(meeting_id))
            .filter(entity::meeting_member::Column::Status.is_in(MemberStatus::ACTIVE))
            .order_by_asc(entity::meeting_member::Column::LastUpdate)
            .all(self.db)
            .await?
            .into_iter()
            .map(MeetingMember::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        members.sort_by_key(|member| member.status != MemberStatus::Leader);

        Ok(members)
    }

    /// Counts leader and members of a meeting.
    pub async fn count_active(&self, meeting_id: i32) -> Result<i32, DbErr> {
        let count = entity::prelude::MeetingMember::find()
            .filter(entity::meeting_member::Column::MeetingId.eq(meeting_id))
            .filter(entity::meeting_member::Column::Status.is_in(MemberStatus::ACTIVE))
            .count(self.db)
            .await?;

        Ok(count as i32)
    }

    /// Writes a user's status, creating the roster entry if needed.
    ///
    /// Game profile columns of an existing entry are kept.
    ///
    /// # Arguments
    /// - `meeting_id` - Meeting id
    /// - `user_id` - Discord user id
    /// - `status` - New status
    /// - `now` - Timestamp stored as `last_update`
    pub async fn set_status(
        &self,
        meeting_id: i32,
        user_id: u64,
        status: MemberStatus,
        now: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        use entity::meeting_member::Column;

        let model = entity::meeting_member::ActiveModel {
            meeting_id: ActiveValue::Set(meeting_id),
            user_id: ActiveValue::Set(user_id.to_string()),
            status: ActiveValue::Set(status),
            last_update: ActiveValue::Set(now),
            display_name: ActiveValue::Set(None),
            membership_id: ActiveValue::Set(None),
            membership_type: ActiveValue::Set(None),
            metric_value: ActiveValue::Set(None),
        };

        entity::prelude::MeetingMember::insert(model)
            .on_conflict(
                OnConflict::columns([Column::MeetingId, Column::UserId])
                    .update_columns([Column::Status, Column::LastUpdate])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }

    /// Changes a user's status only if it currently equals `from`.
    ///
    /// # Returns
    /// - `Ok(rows)` - Number of updated rows, 0 or 1
    /// - `Err(DbErr)` - Database error
    pub async fn transition(
        &self,
        meeting_id: i32,
        user_id: u64,
        from: MemberStatus,
        to: MemberStatus,
        now: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::MeetingMember::update_many()
            .set(entity::meeting_member::ActiveModel {
                status: ActiveValue::Set(to),
                last_update: ActiveValue::Set(now),
                ..Default::default()
            })
            .filter(entity::meeting_member::Column::MeetingId.eq(meeting_id))
            .filter(entity::meeting_member::Column::UserId.eq(user_id.to_string()))
            .filter(entity::meeting_member::Column::Status.eq(from))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Stores game profile data on a roster entry.
    pub async fn set_profile(
        &self,
        meeting_id: i32,
        user_id: u64,
        profile: &PlayerProfile,
    ) -> Result<(), DbErr> {
        entity::prelude::MeetingMember::update_many()
            .set(entity::meeting_member::ActiveModel {
                display_name: ActiveValue::Set(Some(profile.display_name.clone())),
                membership_id: ActiveValue::Set(Some(profile.membership_id)),
                membership_type: ActiveValue::Set(Some(profile.membership_type)),
                metric_value: ActiveValue::Set(profile.metric_value),
                ..Default::default()
            })
            .filter(entity::meeting_member::Column::MeetingId.eq(meeting_id))
            .filter(entity::meeting_member::Column::UserId.eq(user_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
