pub use super::bungie_token::Entity as BungieToken;
pub use super::linked_account::Entity as LinkedAccount;
pub use super::meeting::Entity as Meeting;
pub use super::meeting_channel::Entity as MeetingChannel;
pub use super::meeting_member::Entity as MeetingMember;
