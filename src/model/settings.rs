use chrono::{FixedOffset, Offset, Utc};
use std::time::Duration;

use crate::config::Config;

/// Runtime settings of the meetings subsystem derived from `Config`.
#[derive(Debug, Clone)]
pub struct MeetingSettings {
    pub guild_id: u64,
    pub log_channel_id: Option<u64>,
    pub notify_log_channel_id: Option<u64>,
    pub notifier_role_ids: Vec<u64>,
    pub sweep_interval: Duration,
    /// Offset used to read start times typed by users.
    pub utc_offset: FixedOffset,
}

impl MeetingSettings {
    /// Builds meeting settings from the application configuration.
    ///
    /// Offsets outside of +-23 hours fall back to UTC.
    pub fn from_config(config: &Config) -> Self {
        let utc_offset = FixedOffset::east_opt(config.meetings_utc_offset_hours * 3600)
            .unwrap_or_else(|| {
                tracing::warn!(
                    "Invalid UTC offset {}h, reading start times as UTC",
                    config.meetings_utc_offset_hours
                );
                Utc.fix()
            });

        Self {
            guild_id: config.discord_guild_id,
            log_channel_id: config.meetings_log_channel_id,
            notify_log_channel_id: config.meetings_notify_log_channel_id,
            notifier_role_ids: config.meetings_notifier_role_ids.clone(),
            sweep_interval: Duration::from_secs(config.meetings_sweep_interval_minutes.max(1) * 60),
            utc_offset,
        }
    }
}
