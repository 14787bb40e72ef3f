use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    error::{meeting::MeetingError, AppError},
    scheduler::expiry_queue::ExpiryQueue,
    service::{
        bungie::auth_cache::AuthTokenCache,
        meeting::MeetingService,
        meeting_notification::{MeetingNotificationService, MeetingSink},
    },
};

/// How often expired Bungie.net access tokens are dropped from memory.
const TOKEN_EVICTION_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Starts the meeting expiry scheduler
///
/// Sweeps once right away, then every `sweep_interval`, and hands every open meeting due
/// within the next interval to the expiry queue. A second job evicts expired access tokens.
///
/// # Arguments
/// - `db`: Database connection
/// - `expiry`: Deadline queue closing the meetings
/// - `tokens`: Access token cache of the Bungie.net client
/// - `sweep_interval`: Time between two sweeps
pub async fn start_scheduler(
    db: DatabaseConnection,
    expiry: ExpiryQueue,
    tokens: AuthTokenCache,
    sweep_interval: Duration,
) -> Result<(), AppError> {
    if let Err(e) = sweep(&db, &expiry, sweep_interval).await {
        tracing::error!("Error during initial meeting sweep: {}", e);
    }

    let scheduler = JobScheduler::new().await?;

    let sweep_job = Job::new_repeated_async(sweep_interval, move |_uuid, _lock| {
        let db = db.clone();
        let expiry = expiry.clone();

        Box::pin(async move {
            if let Err(e) = sweep(&db, &expiry, sweep_interval).await {
                tracing::error!("Error sweeping expiring meetings: {}", e);
            }
        })
    })?;

    let eviction_job = Job::new_repeated_async(TOKEN_EVICTION_INTERVAL, move |_uuid, _lock| {
        let tokens = tokens.clone();

        Box::pin(async move {
            let evicted = tokens.evict_expired().await;
            if evicted > 0 {
                tracing::debug!("Evicted {} expired Bungie.net access tokens", evicted);
            }
        })
    })?;

    scheduler.add(sweep_job).await?;
    scheduler.add(eviction_job).await?;
    scheduler.start().await?;

    tracing::info!(
        "Meeting expiry scheduler started, sweeping every {}s",
        sweep_interval.as_secs()
    );

    Ok(())
}

/// Queues every open meeting whose deadline falls before the next sweep.
async fn sweep(
    db: &DatabaseConnection,
    expiry: &ExpiryQueue,
    sweep_interval: Duration,
) -> Result<(), AppError> {
    let horizon = Utc::now() + chrono::Duration::from_std(sweep_interval).unwrap_or_default();
    let candidates = MeetingService::new(db).find_expiring_before(horizon).await?;

    if !candidates.is_empty() {
        tracing::debug!("Queueing {} meetings for expiry", candidates.len());
    }

    for (meeting_id, deadline) in candidates {
        expiry.schedule(meeting_id, deadline);
    }

    Ok(())
}

/// Expires one meeting whose deadline fired and reports the closure.
///
/// A meeting still open with a deadline in the future (its deadline moved, or the timer
/// fired early) is handed back for rescheduling.
///
/// # Arguments
/// - `db`: Database connection
/// - `sink`: Output for message deletion and the log post
/// - `meeting_id`: Meeting whose deadline passed
///
/// # Returns
/// - `Some(deadline)`: The meeting is not due yet and must be queued again
/// - `None`: The meeting was closed, was already closed, or could not be read
pub async fn expire_meeting(
    db: &DatabaseConnection,
    sink: &dyn MeetingSink,
    meeting_id: i32,
) -> Option<DateTime<Utc>> {
    let service = MeetingService::new(db);
    let now = Utc::now();

    let meeting = match service.expire(meeting_id, now).await {
        Ok(Some(meeting)) => meeting,
        Ok(None) => return pending_deadline(&service, meeting_id, now).await,
        Err(e) => {
            tracing::error!("Failed to expire meeting {}: {}", meeting_id, e);
            return None;
        }
    };

    MeetingNotificationService::new(db, sink)
        .closed(&meeting, true)
        .await;

    None
}

/// Deadline of a meeting that is still open but not due at `now`.
async fn pending_deadline(
    service: &MeetingService<'_>,
    meeting_id: i32,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match service.get(meeting_id).await {
        Ok(meeting) if !meeting.status.is_terminal() && meeting.actual_until > now => {
            tracing::debug!(
                "Meeting {} is not due before {}, rescheduling",
                meeting_id,
                meeting.actual_until
            );
            Some(meeting.actual_until)
        }
        Ok(_) | Err(AppError::MeetingErr(MeetingError::NotFound)) => {
            tracing::debug!("Meeting {} was already closed", meeting_id);
            None
        }
        Err(e) => {
            tracing::error!("Failed to read meeting {}: {}", meeting_id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use entity::meeting::MeetingStatus;
    use sea_orm::{DbErr, EntityTrait};
    use test_utils::{builder::TestBuilder, factory};

    use super::*;
    use crate::service::meeting_notification::{
        fake::{RecordingSink, SinkCall},
        LogTarget, MeetingNotice,
    };

    /// Tests expiring an overdue meeting while Discord is unreachable.
    ///
    /// Expected: meeting closed as DeletedByOverdue, deletion and log attempted
    #[tokio::test]
    async fn expires_overdue_meeting_despite_sink_failures() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_meeting_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let channel = factory::create_meeting_channel(db).await?;
        let meeting = factory::meeting::MeetingFactory::new(db, &channel.channel_id, "1001")
            .actual_until(Utc::now() - Duration::minutes(1))
            .build()
            .await?;
        let sink = RecordingSink::failing();

        let retry = expire_meeting(db, &sink, meeting.id).await;

        let stored = entity::prelude::Meeting::find_by_id(meeting.id)
            .one(db)
            .await?
            .unwrap();
        assert_eq!(stored.status, MeetingStatus::DeletedByOverdue);
        assert_eq!(retry, None);

        let calls = sink.calls();
        assert!(matches!(calls.first(), Some(SinkCall::Delete(_))));
        assert_eq!(
            calls.last(),
            Some(&SinkCall::Log(
                LogTarget::Meetings,
                MeetingNotice::Closed {
                    status: MeetingStatus::DeletedByOverdue
                }
            ))
        );

        Ok(())
    }

    /// Tests a deadline firing before the meeting is due.
    ///
    /// Expected: status unchanged, no output, and the stored deadline returned for requeueing
    #[tokio::test]
    async fn leaves_meeting_before_deadline() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_meeting_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let (_channel, meeting) = factory::helpers::create_meeting_with_channel(db).await?;
        let sink = RecordingSink::default();

        let retry = expire_meeting(db, &sink, meeting.id).await;

        let stored = entity::prelude::Meeting::find_by_id(meeting.id)
            .one(db)
            .await?
            .unwrap();
        assert_eq!(stored.status, MeetingStatus::Active);
        assert_eq!(retry, Some(stored.actual_until));
        assert!(sink.calls().is_empty());

        Ok(())
    }

    /// Tests a deadline firing for a meeting that was closed in the meantime.
    ///
    /// Expected: nothing to requeue and no output
    #[tokio::test]
    async fn ignores_closed_meeting() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_meeting_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let channel = factory::create_meeting_channel(db).await?;
        let meeting = factory::meeting::MeetingFactory::new(db, &channel.channel_id, "1001")
            .status(MeetingStatus::Canceled)
            .actual_until(Utc::now() + Duration::hours(1))
            .build()
            .await?;
        let sink = RecordingSink::default();

        assert_eq!(expire_meeting(db, &sink, meeting.id).await, None);
        assert_eq!(expire_meeting(db, &sink, meeting.id + 1000).await, None);
        assert!(sink.calls().is_empty());

        Ok(())
    }
}
