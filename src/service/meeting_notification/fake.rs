//! Recording test double for `MeetingSink`.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    error::AppError,
    model::meeting::{Meeting, MeetingRoster, MessageRef},
    service::meeting_notification::{LogTarget, MeetingNotice, MeetingSink},
};

/// A call received by the sink.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Publish(i32),
    Render(i32),
    Delete(MessageRef),
    Notify(u64, MeetingNotice),
    Log(LogTarget, MeetingNotice),
}

/// Records every call. With `failing` set, every call is recorded and then fails.
#[derive(Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    failing: bool,
    /// Users whose direct messages fail even when the sink works.
    unreachable: Vec<u64>,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn with_unreachable(mut self, user_id: u64) -> Self {
        self.unreachable.push(user_id);
        self
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SinkCall) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);

        if self.failing {
            return Err(serenity::Error::Other("sink unavailable").into());
        }

        Ok(())
    }
}

#[async_trait]
impl MeetingSink for RecordingSink {
    async fn publish(&self, roster: &MeetingRoster) -> Result<MessageRef, AppError> {
        self.record(SinkCall::Publish(roster.meeting.id))?;

        Ok(MessageRef {
            channel_id: roster.channel.post_channel_id(roster.meeting.planned),
            message_id: 900_000 + roster.meeting.id as u64,
        })
    }

    async fn render(&self, roster: &MeetingRoster) -> Result<(), AppError> {
        self.record(SinkCall::Render(roster.meeting.id))
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), AppError> {
        self.record(SinkCall::Delete(message))
    }

    async fn notify_user(
        &self,
        user_id: u64,
        _meeting: &Meeting,
        notice: &MeetingNotice,
    ) -> Result<(), AppError> {
        self.record(SinkCall::Notify(user_id, notice.clone()))?;

        if self.unreachable.contains(&user_id) {
            return Err(serenity::Error::Other("sink unavailable").into());
        }

        Ok(())
    }

    async fn log(
        &self,
        target: LogTarget,
        _meeting: &Meeting,
        notice: &MeetingNotice,
    ) -> Result<(), AppError> {
        self.record(SinkCall::Log(target, notice.clone()))
    }
}
