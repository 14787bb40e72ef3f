use std::str::FromStr;

use crate::error::{config::ConfigError, AppError};

const BUNGIE_API_URL: &str = "https://www.bungie.net/Platform";
const BUNGIE_TOKEN_URL: &str = "https://www.bungie.net/Platform/App/OAuth/token/";

const DEFAULT_SWEEP_INTERVAL_MINUTES: u64 = 10;
const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;

pub struct Config {
    pub database_url: String,

    pub discord_bot_token: String,
    pub discord_guild_id: u64,

    /// Channel receiving completion, cancellation and expiry notices.
    pub meetings_log_channel_id: Option<u64>,
    /// Channel receiving a copy of every leader announcement.
    pub meetings_notify_log_channel_id: Option<u64>,
    /// Roles allowed to send announcements to meetings they do not lead.
    pub meetings_notifier_role_ids: Vec<u64>,
    pub meetings_sweep_interval_minutes: u64,
    /// Offset from UTC used to read start times typed by users.
    pub meetings_utc_offset_hours: i32,

    pub bungie_api_key: String,
    pub bungie_client_id: Option<String>,
    pub bungie_client_secret: Option<String>,

    pub bungie_api_url: String,
    pub bungie_token_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            discord_guild_id: parse("DISCORD_GUILD_ID", &required("DISCORD_GUILD_ID")?)?,
            meetings_log_channel_id: optional("MEETINGS_LOG_CHANNEL_ID")
                .map(|value| parse("MEETINGS_LOG_CHANNEL_ID", &value))
                .transpose()?,
            meetings_notify_log_channel_id: optional("MEETINGS_NOTIFY_LOG_CHANNEL_ID")
                .map(|value| parse("MEETINGS_NOTIFY_LOG_CHANNEL_ID", &value))
                .transpose()?,
            meetings_notifier_role_ids: optional("MEETINGS_NOTIFIER_ROLE_IDS")
                .map(|value| parse_list("MEETINGS_NOTIFIER_ROLE_IDS", &value))
                .transpose()?
                .unwrap_or_default(),
            meetings_sweep_interval_minutes: optional("MEETINGS_SWEEP_INTERVAL_MINUTES")
                .map(|value| parse("MEETINGS_SWEEP_INTERVAL_MINUTES", &value))
                .transpose()?
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_MINUTES),
            meetings_utc_offset_hours: optional("MEETINGS_UTC_OFFSET_HOURS")
                .map(|value| parse("MEETINGS_UTC_OFFSET_HOURS", &value))
                .transpose()?
                .unwrap_or(DEFAULT_UTC_OFFSET_HOURS),
            bungie_api_key: required("BUNGIE_API_KEY")?,
            bungie_client_id: optional("BUNGIE_CLIENT_ID"),
            bungie_client_secret: optional("BUNGIE_CLIENT_SECRET"),
            bungie_api_url: BUNGIE_API_URL.to_string(),
            bungie_token_url: BUNGIE_TOKEN_URL.to_string(),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
        })
}

fn parse_list<T: FromStr>(name: &str, value: &str) -> Result<Vec<T>, ConfigError> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse(name, part))
        .collect()
}
