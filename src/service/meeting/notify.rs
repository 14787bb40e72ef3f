use entity::meeting_member::MemberStatus;

use crate::{
    data::meeting_member::MeetingMemberRepository,
    error::{meeting::MeetingError, AppError},
    model::meeting::Meeting,
    service::meeting::{load_meeting, require_open, MeetingService},
};

/// A message from a meeting participant to the rest of the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub meeting: Meeting,
    pub sender_id: u64,
    /// Active members other than the sender.
    pub recipients: Vec<u64>,
    pub text: String,
}

impl<'a> MeetingService<'a> {
    /// Prepares a notification from `sender_id` to every other active member.
    ///
    /// The leader may always notify. Other users need one of the configured notifier roles.
    ///
    /// # Arguments
    /// - `meeting_id` - Meeting to notify about
    /// - `sender_id` - Discord id of the sender
    /// - `sender_roles` - Guild roles held by the sender
    /// - `notifier_roles` - Roles allowed to notify any meeting
    /// - `text` - Message to deliver
    ///
    /// # Returns
    /// - `Ok(Announcement)` - Recipients to message
    /// - `Err(AppError::MeetingErr)` - Sender not allowed, empty text or meeting over
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn prepare_announcement(
        &self,
        meeting_id: i32,
        sender_id: u64,
        sender_roles: &[u64],
        notifier_roles: &[u64],
        text: &str,
    ) -> Result<Announcement, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MeetingError::EmptyMessage.into());
        }

        let meeting = load_meeting(self.db, meeting_id).await?;
        require_open(&meeting)?;

        let active = MeetingMemberRepository::new(self.db)
            .get_active(meeting_id)
            .await?;
        let is_leader = active
            .iter()
            .any(|member| member.user_id == sender_id && member.status == MemberStatus::Leader);
        let has_role = sender_roles.iter().any(|role| notifier_roles.contains(role));
        if !is_leader && !has_role {
            return Err(MeetingError::NotAllowedToNotify.into());
        }

        Ok(Announcement {
            meeting,
            sender_id,
            recipients: active
                .into_iter()
                .map(|member| member.user_id)
                .filter(|user_id| *user_id != sender_id)
                .collect(),
            text: text.to_string(),
        })
    }
}
