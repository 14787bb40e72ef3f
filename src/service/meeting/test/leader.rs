use super::*;

/// Counts the leaders of a meeting.
async fn leader_count(db: &DatabaseConnection, meeting_id: i32) -> Result<usize, AppError> {
    Ok(MeetingMemberRepository::new(db)
        .get_active(meeting_id)
        .await?
        .iter()
        .filter(|member| member.status == MemberStatus::Leader)
        .count())
}

/// Tests handing leadership to a member.
///
/// Expected: target is the only leader, previous leader is a member
#[tokio::test]
async fn transfers_leadership() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (meeting, members) = factory::helpers::create_meeting_with_members(db, 3, 1).await?;
    let service = MeetingService::new(db);

    let transfer = service
        .transfer_leadership(
            meeting.id,
            id(&meeting.author_id),
            &format!("<@{}>", members[0]),
            Utc::now(),
        )
        .await?;

    assert_eq!(transfer.new_leader_id, id(&members[0]));
    assert_eq!(transfer.previous_leader_id, id(&meeting.author_id));
    assert_eq!(service.leader_of(meeting.id).await?, Some(id(&members[0])));
    assert_eq!(leader_count(db, meeting.id).await?, 1);
    assert_eq!(
        member_status(db, meeting.id, &meeting.author_id).await?,
        Some(MemberStatus::Member)
    );

    Ok(())
}

/// Tests that rejected transfers keep a single leader.
///
/// Expected: self target and non-leader actor rejected, exactly one leader remains
#[tokio::test]
async fn rejected_transfer_keeps_one_leader() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (meeting, members) = factory::helpers::create_meeting_with_members(db, 3, 1).await?;
    let service = MeetingService::new(db);

    let result = service
        .transfer_leadership(meeting.id, id(&meeting.author_id), &meeting.author_id, Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(AppError::MeetingErr(MeetingError::ForbiddenTarget))
    ));

    let result = service
        .transfer_leadership(meeting.id, id(&members[0]), &members[0], Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(AppError::MeetingErr(MeetingError::NotLeader))
    ));

    assert_eq!(leader_count(db, meeting.id).await?, 1);
    assert_eq!(
        service.leader_of(meeting.id).await?,
        Some(id(&meeting.author_id))
    );

    Ok(())
}

/// Tests the rollback when the promotion statement matches no row.
///
/// The target already holds the leader status, so promoting it from member fails after the
/// actor was demoted.
///
/// Expected: Err(MeetingError::TransferFailed), actor still leader, roster version unchanged
#[tokio::test]
async fn failed_promotion_rolls_back_demotion() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_channel, meeting) = factory::helpers::create_meeting_with_channel(db).await?;
    let other = factory::helpers::next_snowflake();
    factory::create_member(db, meeting.id, &other, MemberStatus::Leader).await?;

    let service = MeetingService::new(db);
    let result = service
        .transfer_leadership(meeting.id, id(&meeting.author_id), &other, Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(AppError::MeetingErr(MeetingError::TransferFailed))
    ));

    assert_eq!(
        member_status(db, meeting.id, &meeting.author_id).await?,
        Some(MemberStatus::Leader)
    );
    assert_eq!(service.get(meeting.id).await?.roster_version, 0);

    Ok(())
}
