use entity::meeting::MeetingStatus;
use test_utils::{builder::TestBuilder, factory};

use crate::{
    error::AppError,
    model::meeting::MessageRef,
    service::{
        meeting::MeetingService,
        meeting_notification::{
            fake::{RecordingSink, SinkCall},
            LogTarget, MeetingNotice, MeetingNotificationService,
        },
    },
};

fn id(value: &str) -> u64 {
    value.parse().unwrap()
}

/// Tests publishing a new meeting.
///
/// Expected: message posted once and its location stored on the meeting
#[tokio::test]
async fn publishes_and_records_message() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_channel, meeting) = factory::helpers::create_meeting_with_channel(db).await?;
    let sink = RecordingSink::default();

    let message = MeetingNotificationService::new(db, &sink)
        .publish(meeting.id)
        .await?;

    assert_eq!(sink.calls(), vec![SinkCall::Publish(meeting.id)]);
    let stored = MeetingService::new(db).get(meeting.id).await?;
    assert_eq!(stored.message, Some(message));

    Ok(())
}

/// Tests that a meeting that cannot be posted is canceled.
///
/// Expected: Err returned and the meeting canceled
#[tokio::test]
async fn cancels_meeting_when_publish_fails() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_channel, meeting) = factory::helpers::create_meeting_with_channel(db).await?;
    let sink = RecordingSink::failing();

    let result = MeetingNotificationService::new(db, &sink)
        .publish(meeting.id)
        .await;

    assert!(result.is_err());
    assert_eq!(
        MeetingService::new(db).get(meeting.id).await?.status,
        MeetingStatus::Canceled
    );

    Ok(())
}

/// Tests that rendering skips closed meetings.
///
/// Expected: open meeting rendered, canceled meeting not
#[tokio::test]
async fn refreshes_only_open_meetings() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let channel = factory::create_meeting_channel(db).await?;
    let open = factory::create_meeting(db, &channel.channel_id, "1001").await?;
    let closed = factory::meeting::MeetingFactory::new(db, &channel.channel_id, "1001")
        .status(MeetingStatus::Canceled)
        .build()
        .await?;
    let sink = RecordingSink::default();
    let service = MeetingNotificationService::new(db, &sink);

    service.refresh(open.id).await;
    service.refresh(closed.id).await;

    assert_eq!(sink.calls(), vec![SinkCall::Render(open.id)]);

    Ok(())
}

/// Tests the completion notices.
///
/// Expected: leader messaged and the meetings log written
#[tokio::test]
async fn notifies_leader_on_completion() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_channel, meeting) = factory::helpers::create_meeting_with_channel(db).await?;
    let meeting = MeetingService::new(db).get(meeting.id).await?;
    let sink = RecordingSink::default();

    MeetingNotificationService::new(db, &sink)
        .completed(&meeting)
        .await;

    assert_eq!(
        sink.calls(),
        vec![
            SinkCall::Notify(meeting.author_id, MeetingNotice::Completed),
            SinkCall::Log(LogTarget::Meetings, MeetingNotice::Completed),
        ]
    );

    Ok(())
}

/// Tests that cancellation side effects all run even when each one fails.
///
/// Expected: every member messaged, message deletion and log attempted
#[tokio::test]
async fn cancel_notices_survive_failures() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (meeting, members) = factory::helpers::create_meeting_with_members(db, 4, 2).await?;
    let outcome = MeetingService::new(db)
        .cancel(meeting.id, id(&meeting.author_id), "reset")
        .await?;
    let sink = RecordingSink::failing();

    MeetingNotificationService::new(db, &sink)
        .canceled(&outcome)
        .await;

    let calls = sink.calls();
    let notice = MeetingNotice::Canceled {
        reason: "reset".to_string(),
    };
    for member in &members {
        assert!(calls.contains(&SinkCall::Notify(id(member), notice.clone())));
    }
    let message: MessageRef = outcome.meeting.message.unwrap();
    assert!(calls.contains(&SinkCall::Delete(message)));
    assert_eq!(
        calls.last(),
        Some(&SinkCall::Log(LogTarget::Meetings, notice))
    );

    Ok(())
}

/// Tests the delivery report of an announcement.
///
/// Expected: reachable member delivered, unreachable member failed, copy logged
#[tokio::test]
async fn reports_announcement_delivery() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_meeting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (meeting, members) = factory::helpers::create_meeting_with_members(db, 4, 2).await?;
    let announcement = MeetingService::new(db)
        .prepare_announcement(meeting.id, id(&meeting.author_id), &[], &[], "ready up")
        .await?;
    let sink = RecordingSink::default().with_unreachable(id(&members[1]));

    let report = MeetingNotificationService::new(db, &sink)
        .announce(&announcement)
        .await;

    assert_eq!(report.delivered, vec![id(&members[0])]);
    assert_eq!(report.failed, vec![id(&members[1])]);
    assert!(sink.calls().contains(&SinkCall::Log(
        LogTarget::Notifications,
        MeetingNotice::Announcement {
            sender_id: id(&meeting.author_id),
            text: "ready up".to_string(),
        }
    )));

    Ok(())
}
