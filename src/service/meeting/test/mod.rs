use chrono::{Duration, Utc};
use entity::{meeting::MeetingStatus, meeting_member::MemberStatus};
use sea_orm::DatabaseConnection;
use test_utils::{builder::TestBuilder, factory, factory::meeting::MeetingFactory};

use crate::{
    data::meeting_member::MeetingMemberRepository,
    error::{meeting::MeetingError, AppError},
    service::meeting::MeetingService,
};

mod annotation;
mod leader;
mod moderation;
mod resize;

/// Parses a factory-generated id.
fn id(value: &str) -> u64 {
    value.parse().unwrap()
}

/// Reads the stored status of a roster entry.
async fn member_status(
    db: &DatabaseConnection,
    meeting_id: i32,
    user_id: &str,
) -> Result<Option<MemberStatus>, AppError> {
    Ok(MeetingMemberRepository::new(db)
        .find(meeting_id, id(user_id))
        .await?
        .map(|member| member.status))
}
