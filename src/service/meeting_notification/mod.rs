//! Meeting notification service for Discord side effects.
//!
//! This module provides the `MeetingNotificationService`, which runs after a meeting
//! transition has been committed: it re-renders the meeting message, sends direct messages
//! and posts to the log channels. Every step is best-effort; a failed Discord call is logged
//! and never undoes the persisted transition.
//!
//! Output goes through the `MeetingSink` trait so the service can be exercised without a
//! Discord connection:
//! - `builder` - Embed, button and notice text builders
//! - `discord` - `DiscordMeetingSink`, the serenity implementation

pub mod builder;
pub mod discord;

#[cfg(test)]
pub mod fake;

#[cfg(test)]
mod test;

use async_trait::async_trait;
use entity::{meeting::MeetingStatus, meeting_member::MemberStatus};
use sea_orm::DatabaseConnection;

use crate::{
    data::meeting::MeetingRepository,
    error::{meeting::MeetingError, AppError},
    model::meeting::{CancelOutcome, Meeting, MeetingRoster, MessageRef, RemovalOutcome},
    service::meeting::{leader::LeaderTransfer, notify::Announcement, MeetingService},
};

/// Channels receiving copies of meeting events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Completions, cancellations and closures.
    Meetings,
    /// Announcements sent to meeting rosters.
    Notifications,
}

/// Something that happened to a meeting, as told to users and log channels.
#[derive(Debug, Clone, PartialEq)]
pub enum MeetingNotice {
    Completed,
    Reopened { user_id: u64 },
    Canceled { reason: String },
    Removed { status: MemberStatus, reason: String },
    LeaderAssigned { previous_leader_id: u64 },
    Announcement { sender_id: u64, text: String },
    Closed { status: MeetingStatus },
}

/// Presentation and messaging surface for meetings.
#[async_trait]
pub trait MeetingSink: Send + Sync {
    /// Posts the message presenting a new meeting.
    async fn publish(&self, roster: &MeetingRoster) -> Result<MessageRef, AppError>;

    /// Replaces the embed and buttons of an already published meeting.
    async fn render(&self, roster: &MeetingRoster) -> Result<(), AppError>;

    async fn delete_message(&self, message: MessageRef) -> Result<(), AppError>;

    /// Sends a direct message about a meeting.
    async fn notify_user(
        &self,
        user_id: u64,
        meeting: &Meeting,
        notice: &MeetingNotice,
    ) -> Result<(), AppError>;

    /// Posts a notice to a log channel. Unconfigured channels are skipped.
    async fn log(
        &self,
        target: LogTarget,
        meeting: &Meeting,
        notice: &MeetingNotice,
    ) -> Result<(), AppError>;
}

/// Delivery result of an announcement, reported back to its sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementReport {
    pub delivered: Vec<u64>,
    pub failed: Vec<u64>,
}

pub struct MeetingNotificationService<'a> {
    db: &'a DatabaseConnection,
    sink: &'a dyn MeetingSink,
}

impl<'a> MeetingNotificationService<'a> {
    pub fn new(db: &'a DatabaseConnection, sink: &'a dyn MeetingSink) -> Self {
        Self { db, sink }
    }

    /// Re-renders the message of an open meeting from its persisted state.
    ///
    /// Always reads the meeting again, so calling it more than once is harmless.
    pub async fn refresh(&self, meeting_id: i32) {
        let roster = match MeetingService::new(self.db).get_roster(meeting_id).await {
            Ok(Some(roster)) => roster,
            Ok(None) => return,
            Err(e) => {
                tracing::error!("Failed to load meeting {} for rendering: {}", meeting_id, e);
                return;
            }
        };

        if roster.meeting.status.is_terminal() || roster.meeting.message.is_none() {
            return;
        }

        if let Err(e) = self.sink.render(&roster).await {
            tracing::warn!("Failed to render meeting {}: {}", meeting_id, e);
        }
    }

    /// Publishes a newly created meeting and records its message.
    ///
    /// A meeting that cannot be posted is canceled so it does not linger unseen.
    ///
    /// # Arguments
    /// - `meeting_id` - Meeting to publish
    ///
    /// # Returns
    /// - `Ok(MessageRef)` - Where the meeting was posted
    /// - `Err(AppError)` - Posting or recording failed; the meeting is canceled
    pub async fn publish(&self, meeting_id: i32) -> Result<MessageRef, AppError> {
        let result = self.try_publish(meeting_id).await;

        if let Err(e) = &result {
            tracing::error!("Failed to publish meeting {}: {}", meeting_id, e);

            if let Err(e) = MeetingRepository::new(self.db)
                .close(meeting_id, &MeetingStatus::OPEN, MeetingStatus::Canceled)
                .await
            {
                tracing::error!("Failed to cancel unpublished meeting {}: {}", meeting_id, e);
            }
        }

        result
    }

    async fn try_publish(&self, meeting_id: i32) -> Result<MessageRef, AppError> {
        let service = MeetingService::new(self.db);
        let roster = service
            .get_roster(meeting_id)
            .await?
            .ok_or(MeetingError::NotFound)?;

        let message = self.sink.publish(&roster).await?;
        service.attach_message(meeting_id, message).await?;

        tracing::info!(
            "Published meeting {} as message {} in channel {}",
            meeting_id,
            message.message_id,
            message.channel_id
        );

        Ok(message)
    }

    /// Tells the leader and the log channel that the meeting is full.
    pub async fn completed(&self, meeting: &Meeting) {
        let notice = MeetingNotice::Completed;

        match MeetingService::new(self.db).leader_of(meeting.id).await {
            Ok(Some(leader_id)) => self.notify(leader_id, meeting, &notice).await,
            Ok(None) => tracing::warn!("Completed meeting {} has no leader", meeting.id),
            Err(e) => tracing::error!("Failed to load leader of meeting {}: {}", meeting.id, e),
        }

        self.log(LogTarget::Meetings, meeting, &notice).await;
    }

    /// Logs that a member left a meeting that was full.
    pub async fn reopened(&self, meeting: &Meeting, user_id: u64) {
        self.log(LogTarget::Meetings, meeting, &MeetingNotice::Reopened { user_id })
            .await;
    }

    /// Tells a kicked or banned user why they were removed.
    pub async fn removed(&self, outcome: &RemovalOutcome) {
        let notice = MeetingNotice::Removed {
            status: outcome.status,
            reason: outcome.reason.clone(),
        };
        self.notify(outcome.target_id, &outcome.meeting, &notice)
            .await;

        if outcome.reopened {
            self.reopened(&outcome.meeting, outcome.target_id).await;
        }
    }

    /// Tells the new leader they took over the meeting.
    pub async fn leader_assigned(&self, transfer: &LeaderTransfer) {
        let notice = MeetingNotice::LeaderAssigned {
            previous_leader_id: transfer.previous_leader_id,
        };
        self.notify(transfer.new_leader_id, &transfer.meeting, &notice)
            .await;
    }

    /// Informs the members of a canceled meeting and removes its message.
    pub async fn canceled(&self, outcome: &CancelOutcome) {
        let notice = MeetingNotice::Canceled {
            reason: outcome.reason.clone(),
        };

        for user_id in &outcome.recipients {
            self.notify(*user_id, &outcome.meeting, &notice).await;
        }

        self.delete(&outcome.meeting).await;
        self.log(LogTarget::Meetings, &outcome.meeting, &notice).await;
    }

    /// Reports a meeting closed by expiry or message deletion.
    ///
    /// # Arguments
    /// - `meeting` - Meeting in its terminal status
    /// - `delete_message` - Whether the meeting message still exists and should go
    pub async fn closed(&self, meeting: &Meeting, delete_message: bool) {
        if delete_message {
            self.delete(meeting).await;
        }

        let notice = MeetingNotice::Closed {
            status: meeting.status,
        };
        self.log(LogTarget::Meetings, meeting, &notice).await;
    }

    /// Sends an announcement to its recipients and copies it to the notifications log.
    ///
    /// # Returns
    /// - `AnnouncementReport` - Who received the message and who could not be reached
    pub async fn announce(&self, announcement: &Announcement) -> AnnouncementReport {
        let notice = MeetingNotice::Announcement {
            sender_id: announcement.sender_id,
            text: announcement.text.clone(),
        };
        let mut report = AnnouncementReport::default();

        for user_id in &announcement.recipients {
            match self
                .sink
                .notify_user(*user_id, &announcement.meeting, &notice)
                .await
            {
                Ok(()) => report.delivered.push(*user_id),
                Err(e) => {
                    tracing::warn!(
                        "Failed to deliver announcement of meeting {} to {}: {}",
                        announcement.meeting.id,
                        user_id,
                        e
                    );
                    report.failed.push(*user_id);
                }
            }
        }

        self.log(LogTarget::Notifications, &announcement.meeting, &notice)
            .await;

        report
    }

    async fn notify(&self, user_id: u64, meeting: &Meeting, notice: &MeetingNotice) {
        if let Err(e) = self.sink.notify_user(user_id, meeting, notice).await {
            tracing::warn!(
                "Failed to message user {} about meeting {}: {}",
                user_id,
                meeting.id,
                e
            );
        }
    }

    async fn log(&self, target: LogTarget, meeting: &Meeting, notice: &MeetingNotice) {
        if let Err(e) = self.sink.log(target, meeting, notice).await {
            tracing::warn!(
                "Failed to post {:?} log for meeting {}: {}",
                target,
                meeting.id,
                e
            );
        }
    }

    async fn delete(&self, meeting: &Meeting) {
        let Some(message) = meeting.message else {
            return;
        };

        if let Err(e) = self.sink.delete_message(message).await {
            tracing::warn!(
                "Failed to delete message {} of meeting {}: {}",
                message.message_id,
                meeting.id,
                e
            );
        }
    }
}
