use super::*;

/// Creates a completed two-slot meeting with a leader and one member.
async fn completed_meeting(
    db: &DatabaseConnection,
) -> Result<(entity::meeting::Model, String), AppError> {
    let channel = factory::create_meeting_channel(db).await?;
    let leader = factory::helpers::next_snowflake();
    let member = factory::helpers::next_snowflake();
    let meeting = MeetingFactory::new(db, &channel.channel_id, &leader)
        .fireteam_max(2)
        .status(MeetingStatus::Completed)
        .build()
        .await?;
    factory::create_member(db, meeting.id, &leader, MemberStatus::Leader).await?;
    factory::create_member(db, meeting.id, &member, MemberStatus::Member).await?;

    Ok((meeting, member))
}

/// Tests kicking a member out of a completed meeting.
///
/// Expected: member Kicked, meeting reopened with complete_at cleared
#[tokio::test]
async fn kick_reopens_completed_meeting() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (meeting, member) = completed_meeting(db).await?;

    let outcome = MeetingService::new(db)
        .kick(meeting.id, id(&meeting.author_id), &member, "afk", Utc::now())
        .await?;

    assert_eq!(outcome.target_id, id(&member));
    assert_eq!(outcome.status, MemberStatus::Kicked);
    assert_eq!(outcome.reason, "afk");
    assert!(outcome.reopened);
    assert_eq!(outcome.meeting.status, MeetingStatus::Active);
    assert!(outcome.meeting.complete_at.is_none());
    assert_eq!(
        member_status(db, meeting.id, &member).await?,
        Some(MemberStatus::Kicked)
    );

    Ok(())
}

/// Tests that a banned member cannot come back.
///
/// Expected: ban accepted by roster position, later join rejected with UserBanned
#[tokio::test]
async fn ban_blocks_rejoin() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (meeting, member) = completed_meeting(db).await?;
    let service = MeetingService::new(db);

    let outcome = service
        .ban(meeting.id, id(&meeting.author_id), "2", "griefing", Utc::now())
        .await?;
    assert_eq!(outcome.target_id, id(&member));
    assert_eq!(outcome.status, MemberStatus::Banned);

    let result = service
        .toggle_membership(meeting.id, id(&member), Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(AppError::MeetingErr(MeetingError::UserBanned))
    ));

    Ok(())
}

/// Tests the validation of kick requests.
///
/// Expected: missing reason, self target, unknown target and non-leader actor rejected
#[tokio::test]
async fn rejects_invalid_kicks() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (meeting, member) = completed_meeting(db).await?;
    let service = MeetingService::new(db);
    let leader = id(&meeting.author_id);

    let result = service
        .kick(meeting.id, leader, &member, "   ", Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(AppError::MeetingErr(MeetingError::ReasonRequired))
    ));

    let result = service
        .kick(meeting.id, leader, &meeting.author_id, "test", Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(AppError::MeetingErr(MeetingError::ForbiddenTarget))
    ));

    let result = service
        .kick(meeting.id, leader, "9", "test", Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(AppError::MeetingErr(MeetingError::UnknownTarget(target))) if target == "9"
    ));

    let result = service
        .kick(meeting.id, id(&member), &meeting.author_id, "test", Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(AppError::MeetingErr(MeetingError::NotLeader))
    ));

    assert_eq!(
        member_status(db, meeting.id, &member).await?,
        Some(MemberStatus::Member)
    );

    Ok(())
}
