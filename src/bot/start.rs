use serenity::all::{Client, GatewayIntents};

use crate::{bot::handler::Handler, config::Config, error::AppError, state::BotState};

/// Starts the Discord bot and blocks until it shuts down.
///
/// # Arguments
/// - `config` - Application configuration holding the bot token
/// - `state` - Shared state handed to every event handler
///
/// # Returns
/// - `Ok(())` if the bot ran and shut down cleanly
/// - `Err(AppError)` if bot initialization or the gateway connection fails
pub async fn start_bot(config: &Config, state: BotState) -> Result<(), AppError> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES;

    let handler = Handler::new(state);

    let mut client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
