//! Shared helper utilities for factory methods.

use entity::meeting_member::MemberStatus;
use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Generates a unique Discord snowflake-like id string.
///
/// # Returns
/// - `String` - Numeric id unique within the test run
pub fn next_snowflake() -> String {
    (100_000_000_000_000_000 + next_id()).to_string()
}

/// Creates a meeting channel and an active meeting in it, with the author seated as leader.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok((channel, meeting))` - Created channel and meeting
/// - `Err(DbErr)` - Database error during creation
pub async fn create_meeting_with_channel(
    db: &DatabaseConnection,
) -> Result<(entity::meeting_channel::Model, entity::meeting::Model), DbErr> {
    let channel = crate::factory::meeting_channel::create_meeting_channel(db).await?;
    let author_id = next_snowflake();
    let meeting =
        crate::factory::meeting::create_meeting(db, &channel.channel_id, &author_id).await?;
    crate::factory::meeting_member::create_member(db, meeting.id, &author_id, MemberStatus::Leader)
        .await?;

    Ok((channel, meeting))
}

/// Creates a meeting with a leader and the given number of extra members.
///
/// # Arguments
/// - `db` - Database connection
/// - `fireteam_max` - Capacity of the meeting
/// - `members` - Number of `Member` rows to add besides the leader
///
/// # Returns
/// - `Ok((meeting, member_ids))` - Meeting and the user ids of the added members
/// - `Err(DbErr)` - Database error during creation
pub async fn create_meeting_with_members(
    db: &DatabaseConnection,
    fireteam_max: i32,
    members: usize,
) -> Result<(entity::meeting::Model, Vec<String>), DbErr> {
    let channel = crate::factory::meeting_channel::create_meeting_channel(db).await?;
    let author_id = next_snowflake();
    let meeting = crate::factory::meeting::MeetingFactory::new(db, &channel.channel_id, &author_id)
        .fireteam_max(fireteam_max)
        .build()
        .await?;
    crate::factory::meeting_member::create_member(db, meeting.id, &author_id, MemberStatus::Leader)
        .await?;

    let mut ids = Vec::with_capacity(members);
    for _ in 0..members {
        let user_id = next_snowflake();
        crate::factory::meeting_member::create_member(
            db,
            meeting.id,
            &user_id,
            MemberStatus::Member,
        )
        .await?;
        ids.push(user_id);
    }

    Ok((meeting, ids))
}
