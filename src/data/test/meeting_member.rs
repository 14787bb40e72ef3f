use super::*;
use crate::{data::meeting_member::MeetingMemberRepository, model::bungie::PlayerProfile};

/// Tests that the active roster lists the leader first.
///
/// Verifies ordering and that inactive entries are excluded.
///
/// Expected: Ok with leader, then members in joining order
#[tokio::test]
async fn lists_leader_first() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let channel = factory::create_meeting_channel(db).await?;
    let meeting = factory::create_meeting(db, &channel.channel_id, "1001").await?;

    let repo = MeetingMemberRepository::new(db);
    let now = Utc::now();
    repo.set_status(meeting.id, 2001, MemberStatus::Member, now - Duration::minutes(3))
        .await?;
    repo.set_status(meeting.id, 1001, MemberStatus::Leader, now - Duration::minutes(2))
        .await?;
    repo.set_status(meeting.id, 2002, MemberStatus::Member, now - Duration::minutes(1))
        .await?;
    repo.set_status(meeting.id, 2003, MemberStatus::Kicked, now).await?;

    let roster: Vec<u64> = repo
        .get_active(meeting.id)
        .await?
        .into_iter()
        .map(|member| member.user_id)
        .collect();

    assert_eq!(roster, vec![1001, 2001, 2002]);
    assert_eq!(repo.count_active(meeting.id).await?, 3);

    Ok(())
}

/// Tests that rewriting a status keeps the game profile of the entry.
///
/// Expected: Ok with status updated and profile preserved
#[tokio::test]
async fn set_status_keeps_profile() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_channel, meeting) = factory::helpers::create_meeting_with_channel(db).await?;

    let repo = MeetingMemberRepository::new(db);
    repo.set_status(meeting.id, 2001, MemberStatus::Member, Utc::now())
        .await?;
    repo.set_profile(
        meeting.id,
        2001,
        &PlayerProfile {
            display_name: "Guardian#0001".to_string(),
            membership_id: 4611686018467284386,
            membership_type: 3,
            metric_value: Some(120),
        },
    )
    .await?;
    repo.set_status(meeting.id, 2001, MemberStatus::Left, Utc::now())
        .await?;

    let member = repo.find(meeting.id, 2001).await?.unwrap();
    assert_eq!(member.status, MemberStatus::Left);
    assert_eq!(member.display_name.as_deref(), Some("Guardian#0001"));
    assert_eq!(member.metric_value, Some(120));

    Ok(())
}

/// Tests a guarded status transition.
///
/// Expected: 0 rows when the current status differs, 1 row when it matches
#[tokio::test]
async fn transitions_only_from_expected_status() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (meeting, members) = factory::helpers::create_meeting_with_members(db, 3, 1).await?;
    let meeting_id = meeting.id;
    let member_id: u64 = members[0].parse().unwrap();

    let repo = MeetingMemberRepository::new(db);
    let rows = repo
        .transition(
            meeting_id,
            member_id,
            MemberStatus::Leader,
            MemberStatus::Member,
            Utc::now(),
        )
        .await?;
    assert_eq!(rows, 0);

    let rows = repo
        .transition(
            meeting_id,
            member_id,
            MemberStatus::Member,
            MemberStatus::Leader,
            Utc::now(),
        )
        .await?;
    assert_eq!(rows, 1);

    Ok(())
}
