//! Shared state of the bot's event handlers.
//!
//! The state is built once at startup and cloned into every handler and spawned task. All
//! fields are cheap to clone: the database connection is a pool and the sinks are behind
//! `Arc`.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::{
    model::settings::MeetingSettings,
    scheduler::expiry_queue::ExpiryQueue,
    service::{bungie::PlayerStatsSource, meeting_notification::MeetingSink},
};

#[derive(Clone)]
pub struct BotState {
    pub db: DatabaseConnection,
    /// Discord output for meeting messages, direct messages and logs.
    pub sink: Arc<dyn MeetingSink>,
    /// Game profile lookups for roster annotation.
    pub stats: Arc<dyn PlayerStatsSource>,
    /// Deadline queue; new meetings are added as soon as they are published.
    pub expiry: ExpiryQueue,
    pub settings: MeetingSettings,
}
