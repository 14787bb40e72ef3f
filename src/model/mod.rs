//! Domain models and parameter types.
//!
//! Domain models are converted from entity models at the repository boundary. Discord ids are
//! stored as strings in the database and carried as `u64` from here on.

pub mod activity;
pub mod bungie;
pub mod custom_id;
pub mod meeting;
pub mod meeting_channel;
pub mod settings;
