//! Discord gateway integration of the meetings bot.
//!
//! The bot reacts to three kinds of gateway events: the `ready` event registers the guild's
//! slash commands, interactions (buttons, forms and the admin command) drive the meeting
//! lifecycle, and message deletions close meetings whose message was removed by someone else.
//!
//! Outbound messages are not sent from here directly but through the `MeetingSink` held in
//! `BotState`, which shares its HTTP client with the expiry scheduler.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Receive interactions and channel information for the guild
//! - `GUILD_MESSAGES` - Receive message delete events for meeting messages
//!
//! Neither intent is privileged.

pub mod handler;
pub mod start;
