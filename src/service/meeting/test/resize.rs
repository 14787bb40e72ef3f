use super::*;
use crate::service::meeting::resize::plan_resize;

/// Tests the size rules.
///
/// Expected: below one, above channel max and below roster rejected; equal completes
#[test]
fn resize_rules() {
    assert_eq!(plan_resize(0, 1, 6), Err(MeetingError::SizeTooSmall));
    assert_eq!(plan_resize(7, 1, 6), Err(MeetingError::SizeAboveMax { max: 6 }));
    assert_eq!(
        plan_resize(2, 3, 6),
        Err(MeetingError::SizeBelowActive { active: 3 })
    );
    assert_eq!(plan_resize(3, 3, 6), Ok(MeetingStatus::Completed));
    assert_eq!(plan_resize(4, 3, 6), Ok(MeetingStatus::Active));
}

/// Tests shrinking a meeting to its roster size.
///
/// Expected: meeting completed with complete_at set and new size stored
#[tokio::test]
async fn shrinking_to_roster_completes() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (meeting, _) = factory::helpers::create_meeting_with_members(db, 4, 1).await?;

    let outcome = MeetingService::new(db)
        .resize(meeting.id, id(&meeting.author_id), 2, Utc::now())
        .await?;

    assert!(outcome.completed);
    assert_eq!(outcome.meeting.fireteam_max, 2);
    assert_eq!(outcome.meeting.status, MeetingStatus::Completed);
    assert!(outcome.meeting.complete_at.is_some());

    Ok(())
}

/// Tests growing a completed meeting.
///
/// Expected: meeting active again with complete_at cleared
#[tokio::test]
async fn growing_completed_meeting_reopens() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let channel = factory::create_meeting_channel(db).await?;
    let meeting = MeetingFactory::new(db, &channel.channel_id, "1001")
        .fireteam_max(1)
        .status(MeetingStatus::Completed)
        .build()
        .await?;
    factory::create_member(db, meeting.id, "1001", MemberStatus::Leader).await?;

    let outcome = MeetingService::new(db)
        .resize(meeting.id, 1001, 3, Utc::now())
        .await?;

    assert!(!outcome.completed);
    assert_eq!(outcome.meeting.status, MeetingStatus::Active);
    assert_eq!(outcome.meeting.fireteam_max, 3);
    assert!(outcome.meeting.complete_at.is_none());

    Ok(())
}

/// Tests that only the leader may resize and the channel limit applies.
///
/// Expected: NotLeader for a member, SizeAboveMax above the channel limit
#[tokio::test]
async fn rejects_invalid_resize() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (meeting, members) = factory::helpers::create_meeting_with_members(db, 3, 1).await?;
    let service = MeetingService::new(db);

    let result = service
        .resize(meeting.id, id(&members[0]), 4, Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(AppError::MeetingErr(MeetingError::NotLeader))
    ));

    let result = service
        .resize(meeting.id, id(&meeting.author_id), 7, Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(AppError::MeetingErr(MeetingError::SizeAboveMax { max: 6 }))
    ));

    Ok(())
}
