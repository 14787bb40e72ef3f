//! Error types for the meetings bot.
//!
//! `AppError` is the top-level error returned by services and startup code. It wraps
//! domain-specific errors and the errors of the libraries the bot talks to. Interaction
//! handlers turn an `AppError` into a single ephemeral reply with `user_message()`.

pub mod bungie;
pub mod config;
pub mod internal;
pub mod meeting;

use thiserror::Error;

use crate::error::{
    bungie::BungieError, config::ConfigError, internal::InternalError, meeting::MeetingError,
};

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Bungie.net API error.
    #[error(transparent)]
    BungieErr(#[from] BungieError),

    /// A meeting operation was rejected by validation.
    ///
    /// The display text is shown to the acting user as is.
    #[error(transparent)]
    MeetingErr(#[from] MeetingError),

    /// Unexpected internal state indicating a bug.
    #[error(transparent)]
    InternalErr(#[from] InternalError),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to keep the size of every `AppError` variant small.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Text shown to a Discord user when their interaction failed with this error.
    ///
    /// Validation rejections are shown verbatim. Everything else is logged and replaced with a
    /// generic message so internal details never reach the chat.
    ///
    /// # Returns
    /// - `String` - Message suitable for an ephemeral reply
    pub fn user_message(&self) -> String {
        match self {
            Self::MeetingErr(err) => err.to_string(),
            err => {
                tracing::error!("Interaction failed: {}", err);
                "Something went wrong, please try again later.".to_string()
            }
        }
    }
}
