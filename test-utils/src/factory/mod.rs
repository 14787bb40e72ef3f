//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with a `Factory` struct for customization and a
//! `create_*` convenience function for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let channel = factory::create_meeting_channel(&db).await?;
//! let meeting = factory::meeting::MeetingFactory::new(&db, &channel.channel_id, "1001")
//!     .fireteam_max(2)
//!     .build()
//!     .await?;
//! factory::create_member(&db, meeting.id, "1001", MemberStatus::Leader).await?;
//! ```
//!
//! # Available Factories
//!
//! - `meeting_channel` - Meeting channel configuration
//! - `meeting` - Meetings
//! - `meeting_member` - Roster entries
//! - `linked_account` - Discord to Bungie.net links
//! - `bungie_token` - OAuth refresh tokens of linked accounts
//! - `helpers` - Convenience methods for creating entities with dependencies

pub mod bungie_token;
pub mod helpers;
pub mod linked_account;
pub mod meeting;
pub mod meeting_channel;
pub mod meeting_member;

pub use bungie_token::create_bungie_token;
pub use linked_account::create_linked_account;
pub use meeting::create_meeting;
pub use meeting_channel::create_meeting_channel;
pub use meeting_member::create_member;
