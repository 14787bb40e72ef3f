//! SeaORM entities for the meetings bot.
//!
//! Every table the bot reads or writes has a module here. Status columns are
//! stored as stable lowercase codes through `DeriveActiveEnum`; display text for
//! those statuses lives next to the enums and never reaches the database.

pub mod prelude;

pub mod bungie_token;
pub mod linked_account;
pub mod meeting;
pub mod meeting_channel;
pub mod meeting_member;
