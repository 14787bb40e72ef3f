//! Service layer for business logic and orchestration.
//!
//! Services sit between the Discord interaction handlers and the repositories. They validate
//! requests against freshly read state, run the writes, and hand results to the notification
//! layer.

pub mod bungie;
pub mod meeting;
pub mod meeting_notification;
