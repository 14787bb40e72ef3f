use thiserror::Error;

/// Validation rejections of meeting operations.
///
/// The display text of every variant is written for the user who triggered the operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeetingError {
    #[error("Meeting not found.")]
    NotFound,

    #[error("This channel is not configured for meetings.")]
    ChannelNotConfigured,

    #[error("The meeting is over.")]
    MeetingOver,

    #[error("The leader cannot leave the meeting. Transfer leadership or cancel it instead.")]
    LeaderCannotLeave,

    #[error("You are banned from this meeting.")]
    UserBanned,

    #[error("The meeting is full.")]
    MeetingFull,

    #[error("Only the meeting leader can do this.")]
    NotLeader,

    #[error("You are not allowed to send notifications for this meeting.")]
    NotAllowedToNotify,

    #[error("Could not find a member matching '{0}'.")]
    UnknownTarget(String),

    #[error("You cannot target yourself or the meeting author.")]
    ForbiddenTarget,

    #[error("That user is not an active member of the meeting.")]
    TargetNotActive,

    #[error("A reason is required.")]
    ReasonRequired,

    #[error("The message cannot be empty.")]
    EmptyMessage,

    #[error("The fireteam size must be at least 1.")]
    SizeTooSmall,

    #[error("The fireteam size cannot be below the {active} members already signed up.")]
    SizeBelowActive {
        /// Current active roster size
        active: i32,
    },

    #[error("The fireteam size cannot exceed {max} in this channel.")]
    SizeAboveMax {
        /// Channel maximum
        max: i32,
    },

    #[error("Descriptions are limited to {max} characters.")]
    DescriptionTooLong {
        /// Maximum allowed length in characters
        max: usize,
    },

    #[error("Could not read start time '{0}'. Use the DD.MM-HH:MM format.")]
    InvalidStartTime(String),

    #[error("Could not read fireteam size '{0}'.")]
    InvalidSize(String),

    #[error("Leadership could not be transferred.")]
    TransferFailed,

    #[error("The meeting changed while you were editing it, please try again.")]
    Conflict,
}
