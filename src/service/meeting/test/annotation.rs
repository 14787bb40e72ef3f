use super::*;
use crate::{model::bungie::PlayerProfile, service::bungie::fake::FakeStatsSource};

fn profile() -> PlayerProfile {
    PlayerProfile {
        display_name: "Guardian#0007".to_string(),
        membership_id: 4611686018400000001,
        membership_type: 3,
        metric_value: Some(42),
    }
}

/// Tests annotating a member with a linked account.
///
/// Expected: Ok(true) and the profile stored on the roster entry
#[tokio::test]
async fn annotates_linked_member() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_channel, meeting) = factory::helpers::create_meeting_with_channel(db).await?;
    factory::create_linked_account(db, &meeting.author_id, 900).await?;
    let stats = FakeStatsSource::default().with_profile(900, profile());

    let annotated = MeetingService::new(db)
        .annotate_member(&stats, meeting.id, id(&meeting.author_id))
        .await?;
    assert!(annotated);

    let member = MeetingMemberRepository::new(db)
        .find(meeting.id, id(&meeting.author_id))
        .await?
        .unwrap();
    assert_eq!(member.display_name.as_deref(), Some("Guardian#0007"));
    assert_eq!(member.membership_type, Some(3));
    assert_eq!(member.metric_value, Some(42));

    Ok(())
}

/// Tests that missing links and failed lookups leave the entry alone.
///
/// Expected: Ok(false) in both cases, no profile stored
#[tokio::test]
async fn skips_unavailable_profiles() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (meeting, members) = factory::helpers::create_meeting_with_members(db, 3, 1).await?;
    factory::create_linked_account(db, &members[0], 901).await?;
    let stats = FakeStatsSource::default();
    let service = MeetingService::new(db);

    assert!(
        !service
            .annotate_member(&stats, meeting.id, id(&meeting.author_id))
            .await?
    );
    assert!(
        !service
            .annotate_member(&stats, meeting.id, id(&members[0]))
            .await?
    );

    let member = MeetingMemberRepository::new(db)
        .find(meeting.id, id(&members[0]))
        .await?
        .unwrap();
    assert_eq!(member.display_name, None);

    Ok(())
}
