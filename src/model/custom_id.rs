//! Custom ids carried by meeting buttons and modals.
//!
//! Buttons on a meeting message carry only the action, the meeting is looked up by the id of
//! the message the button belongs to. Modals carry the meeting id (or the meeting channel id
//! for the creation form) after a second colon, e.g. `meeting_modal:kick:42`.

const BUTTON_PREFIX: &str = "meeting";
const MODAL_PREFIX: &str = "meeting_modal";

/// Custom id of the "Create meeting" button on a channel's init message.
pub const CREATE_BUTTON_ID: &str = "meeting:create";

/// Custom id of the button confirming publication despite overlapping meetings.
pub const CONFIRM_PUBLISH_ID: &str = "meeting:confirm_publish";

/// Actions offered on a meeting message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingAction {
    Join,
    Notify,
    Kick,
    Ban,
    Description,
    Size,
    Leader,
    Cancel,
}

impl MeetingAction {
    pub const ALL: [MeetingAction; 8] = [
        MeetingAction::Join,
        MeetingAction::Notify,
        MeetingAction::Kick,
        MeetingAction::Ban,
        MeetingAction::Description,
        MeetingAction::Size,
        MeetingAction::Leader,
        MeetingAction::Cancel,
    ];

    pub fn code(&self) -> &'static str {
        self.form().map_or("join", |form| form.code())
    }

    /// Form the action opens; `None` for joining, which acts on the press itself.
    pub fn form(&self) -> Option<FormAction> {
        match self {
            MeetingAction::Join => None,
            MeetingAction::Notify => Some(FormAction::Notify),
            MeetingAction::Kick => Some(FormAction::Kick),
            MeetingAction::Ban => Some(FormAction::Ban),
            MeetingAction::Description => Some(FormAction::Description),
            MeetingAction::Size => Some(FormAction::Size),
            MeetingAction::Leader => Some(FormAction::Leader),
            MeetingAction::Cancel => Some(FormAction::Cancel),
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.code() == code)
    }

    /// Custom id of the action's button.
    pub fn button_id(&self) -> String {
        format!("{}:{}", BUTTON_PREFIX, self.code())
    }
}

/// Meeting actions that collect input through a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Notify,
    Kick,
    Ban,
    Description,
    Size,
    Leader,
    Cancel,
}

impl FormAction {
    pub const ALL: [FormAction; 7] = [
        FormAction::Notify,
        FormAction::Kick,
        FormAction::Ban,
        FormAction::Description,
        FormAction::Size,
        FormAction::Leader,
        FormAction::Cancel,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            FormAction::Notify => "notify",
            FormAction::Kick => "kick",
            FormAction::Ban => "ban",
            FormAction::Description => "description",
            FormAction::Size => "size",
            FormAction::Leader => "leader",
            FormAction::Cancel => "cancel",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.code() == code)
    }

    /// Custom id of the form for a meeting.
    pub fn modal_id(&self, meeting_id: i32) -> String {
        format!("{}:{}:{}", MODAL_PREFIX, self.code(), meeting_id)
    }
}

/// Custom id of the creation form for a meeting channel.
pub fn create_modal_id(channel_id: u64) -> String {
    format!("{}:create:{}", MODAL_PREFIX, channel_id)
}

/// A pressed button the meetings module handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Create,
    Action(MeetingAction),
}

/// A submitted form the meetings module handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalId {
    Create { channel_id: u64 },
    Action { action: FormAction, meeting_id: i32 },
}

/// Parses a button custom id.
///
/// # Returns
/// - `Some(ButtonId)` - A meeting button
/// - `None` - Foreign or malformed id
pub fn parse_button_id(custom_id: &str) -> Option<ButtonId> {
    if custom_id == CREATE_BUTTON_ID {
        return Some(ButtonId::Create);
    }

    let code = custom_id.strip_prefix(BUTTON_PREFIX)?.strip_prefix(':')?;
    MeetingAction::from_code(code).map(ButtonId::Action)
}

/// Parses a modal custom id.
///
/// # Returns
/// - `Some(ModalId)` - A meeting form with its target id
/// - `None` - Foreign or malformed id, or an action without a form
pub fn parse_modal_id(custom_id: &str) -> Option<ModalId> {
    let rest = custom_id.strip_prefix(MODAL_PREFIX)?.strip_prefix(':')?;
    let (code, id) = rest.split_once(':')?;

    if code == "create" {
        return id
            .parse()
            .ok()
            .map(|channel_id| ModalId::Create { channel_id });
    }

    let action = FormAction::from_code(code)?;
    let meeting_id = id.parse().ok()?;

    Some(ModalId::Action { action, meeting_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests reading the button ids placed on meeting messages.
    ///
    /// Expected: every action parses back, foreign ids ignored
    #[test]
    fn parses_button_ids() {
        for action in MeetingAction::ALL {
            assert_eq!(
                parse_button_id(&action.button_id()),
                Some(ButtonId::Action(action))
            );
        }
        assert_eq!(parse_button_id("meeting:create"), Some(ButtonId::Create));
        assert_eq!(parse_button_id("meeting:unknown"), None);
        assert_eq!(parse_button_id("roles:join"), None);
        assert_eq!(parse_button_id(CONFIRM_PUBLISH_ID), None);
    }

    /// Tests reading form ids.
    ///
    /// Expected: meeting and channel ids recovered, malformed ids ignored
    #[test]
    fn parses_modal_ids() {
        assert_eq!(
            parse_modal_id("meeting_modal:kick:42"),
            Some(ModalId::Action {
                action: FormAction::Kick,
                meeting_id: 42
            })
        );
        for action in FormAction::ALL {
            assert_eq!(
                parse_modal_id(&action.modal_id(7)),
                Some(ModalId::Action {
                    action,
                    meeting_id: 7
                })
            );
        }
        assert_eq!(
            parse_modal_id(&create_modal_id(1234)),
            Some(ModalId::Create { channel_id: 1234 })
        );
        assert_eq!(parse_modal_id("meeting_modal:kick"), None);
        assert_eq!(parse_modal_id("meeting_modal:kick:abc"), None);
        assert_eq!(parse_modal_id("meeting:kick:42"), None);
    }

    /// Tests that joining never maps to a form.
    ///
    /// Expected: no form for the join button, join form ids rejected, every other button
    /// opens the form with its own code
    #[test]
    fn join_has_no_form() {
        assert_eq!(MeetingAction::Join.form(), None);
        assert_eq!(parse_modal_id("meeting_modal:join:42"), None);

        for action in MeetingAction::ALL {
            if let Some(form) = action.form() {
                assert_eq!(form.code(), action.code());
            }
        }
        assert_eq!(
            MeetingAction::ALL
                .iter()
                .filter_map(MeetingAction::form)
                .count(),
            FormAction::ALL.len()
        );
    }
}
