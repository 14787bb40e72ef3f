//! Ready event handler for bot initialization.
//!
//! Fired once per gateway connection after the handshake. Besides logging the connection it
//! registers the guild's slash commands, replacing whatever was registered before.

use serenity::all::{Context, GuildId, Ready};

use crate::{bot::handler::interaction::command, state::BotState};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `state` - Shared bot state holding the configured guild
/// - `ctx` - Discord context used to register commands
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &BotState, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    let guild_id = GuildId::new(state.settings.guild_id);

    match guild_id
        .set_commands(&ctx.http, vec![command::register()])
        .await
    {
        Ok(commands) => tracing::info!(
            "Registered {} slash commands in guild {}",
            commands.len(),
            guild_id
        ),
        Err(e) => tracing::error!(
            "Failed to register slash commands in guild {}: {:?}",
            guild_id,
            e
        ),
    }
}
