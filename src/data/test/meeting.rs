use super::*;
use crate::data::meeting::{MeetingChange, MeetingRepository};
use test_utils::factory::meeting::MeetingFactory;

/// Tests that a stale roster version is rejected.
///
/// Verifies the compare-and-set only applies a change for the version that was read,
/// so the second of two writers reading the same version loses.
///
/// Expected: Ok(true) for the first writer, Ok(false) for the second
#[tokio::test]
async fn rejects_stale_roster_version() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_channel, meeting) = factory::helpers::create_meeting_with_channel(db).await?;
    let repo = MeetingRepository::new(db);

    let change = MeetingChange {
        status: MeetingStatus::Completed,
        complete_at: Some(Utc::now()),
        fireteam_max: None,
    };
    assert!(
        repo.compare_and_set(meeting.id, 0, MeetingStatus::Active, change.clone())
            .await?
    );
    assert!(
        !repo
            .compare_and_set(meeting.id, 0, MeetingStatus::Active, change)
            .await?
    );

    let stored = repo.find_by_id(meeting.id).await?.unwrap();
    assert_eq!(stored.roster_version, 1);
    assert_eq!(stored.status, MeetingStatus::Completed);

    Ok(())
}

/// Tests applying the expiry transition twice.
///
/// Expected: First call closes the meeting, second call changes nothing
#[tokio::test]
async fn expires_meeting_once() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let channel = factory::create_meeting_channel(db).await?;
    let meeting = MeetingFactory::new(db, &channel.channel_id, "1001")
        .actual_until(Utc::now() - Duration::minutes(1))
        .build()
        .await?;

    let repo = MeetingRepository::new(db);
    assert!(repo.expire(meeting.id, Utc::now()).await?);
    assert!(!repo.expire(meeting.id, Utc::now()).await?);

    let stored = repo.find_by_id(meeting.id).await?.unwrap();
    assert_eq!(stored.status, MeetingStatus::DeletedByOverdue);

    Ok(())
}

/// Tests that completed meetings expire into their own terminal status.
///
/// Expected: Ok with DeletedByCompleted
#[tokio::test]
async fn expires_completed_meeting_as_deleted_by_completed() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let channel = factory::create_meeting_channel(db).await?;
    let meeting = MeetingFactory::new(db, &channel.channel_id, "1001")
        .status(MeetingStatus::Completed)
        .actual_until(Utc::now() - Duration::minutes(1))
        .build()
        .await?;

    let repo = MeetingRepository::new(db);
    assert!(repo.expire(meeting.id, Utc::now()).await?);

    let stored = repo.find_by_id(meeting.id).await?.unwrap();
    assert_eq!(stored.status, MeetingStatus::DeletedByCompleted);

    Ok(())
}

/// Tests that meetings are not expired before their deadline.
///
/// Expected: Ok(false) and status unchanged
#[tokio::test]
async fn does_not_expire_before_deadline() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_channel, meeting) = factory::helpers::create_meeting_with_channel(db).await?;

    let repo = MeetingRepository::new(db);
    assert!(!repo.expire(meeting.id, Utc::now()).await?);
    assert_eq!(
        repo.find_by_id(meeting.id).await?.unwrap().status,
        MeetingStatus::Active
    );

    Ok(())
}

/// Tests that terminal meetings cannot be closed again.
///
/// Expected: Ok(false) when canceling an already expired meeting
#[tokio::test]
async fn does_not_close_terminal_meeting() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let channel = factory::create_meeting_channel(db).await?;
    let meeting = MeetingFactory::new(db, &channel.channel_id, "1001")
        .status(MeetingStatus::DeletedByOverdue)
        .build()
        .await?;

    let repo = MeetingRepository::new(db);
    assert!(
        !repo
            .close(meeting.id, &MeetingStatus::OPEN, MeetingStatus::Canceled)
            .await?
    );
    assert_eq!(
        repo.find_by_id(meeting.id).await?.unwrap().status,
        MeetingStatus::DeletedByOverdue
    );

    Ok(())
}

/// Tests selecting sweep candidates.
///
/// Verifies that only open meetings with a deadline before the horizon are returned.
///
/// Expected: Ok with the due active meeting only
#[tokio::test]
async fn finds_meetings_expiring_before_horizon() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let channel = factory::create_meeting_channel(db).await?;
    let due = MeetingFactory::new(db, &channel.channel_id, "1001")
        .actual_until(Utc::now() + Duration::minutes(5))
        .build()
        .await?;
    MeetingFactory::new(db, &channel.channel_id, "1002")
        .actual_until(Utc::now() + Duration::hours(5))
        .build()
        .await?;
    MeetingFactory::new(db, &channel.channel_id, "1003")
        .status(MeetingStatus::Canceled)
        .actual_until(Utc::now() - Duration::minutes(5))
        .build()
        .await?;

    let repo = MeetingRepository::new(db);
    let candidates = repo
        .find_expiring_before(Utc::now() + Duration::minutes(10))
        .await?;

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].0, due.id);

    Ok(())
}

/// Tests finding a user's meetings around a start time.
///
/// Verifies that meetings the user left are ignored.
///
/// Expected: Ok with only the meeting the user is still active in
#[tokio::test]
async fn finds_open_meetings_for_user_in_window() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let channel = factory::create_meeting_channel(db).await?;
    let start = Utc::now() + Duration::hours(3);
    let active = MeetingFactory::new(db, &channel.channel_id, "1001")
        .start_at(start)
        .build()
        .await?;
    let left = MeetingFactory::new(db, &channel.channel_id, "1002")
        .start_at(start + Duration::minutes(30))
        .build()
        .await?;
    factory::create_member(db, active.id, "2001", MemberStatus::Member).await?;
    factory::create_member(db, left.id, "2001", MemberStatus::Left).await?;

    let repo = MeetingRepository::new(db);
    let found = repo
        .find_open_for_user_between(2001, start - Duration::hours(2), start + Duration::hours(2))
        .await?;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, active.id);

    Ok(())
}
