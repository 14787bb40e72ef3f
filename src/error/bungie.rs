use thiserror::Error;

/// Failures talking to the Bungie.net API.
///
/// Callers annotating rosters treat every variant as "no annotation".
#[derive(Error, Debug)]
pub enum BungieError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Bungie.net answered with a non-success platform error code.
    #[error("Bungie.net returned {status}: {message}")]
    Platform {
        /// `ErrorStatus` field of the response envelope
        status: String,
        /// `Message` field of the response envelope
        message: String,
    },

    /// The response did not carry the fields the bot expects.
    #[error("Unexpected Bungie.net response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}
