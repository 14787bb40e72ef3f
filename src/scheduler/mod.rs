//! Background jobs of the meetings bot.
//!
//! - `expiry_queue` - Per-meeting deadline timer
//! - `meeting_expiry` - Periodic sweep feeding the queue, and auth token eviction

pub mod expiry_queue;
pub mod meeting_expiry;
