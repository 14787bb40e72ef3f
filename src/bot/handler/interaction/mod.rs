//! Interaction handlers.
//!
//! Buttons on meeting messages either toggle membership directly or open a form; submitted
//! forms run the matching meeting operation. Every user-facing outcome is a single ephemeral
//! message. Handlers that may wait on the database or on other users defer the interaction
//! first and edit the deferred response afterwards.

use serenity::all::{
    Context, CreateInteractionResponse, CreateInteractionResponseMessage, Interaction, Member,
};

use crate::state::BotState;

pub mod command;
pub mod component;
pub mod create;
pub mod form;
pub mod modal;

/// Dispatches an interaction to its handler.
pub async fn handle_interaction(state: &BotState, ctx: Context, interaction: Interaction) {
    match interaction {
        Interaction::Component(component) => {
            component::handle_component(state, &ctx, component).await
        }
        Interaction::Modal(modal) => modal::handle_modal(state, &ctx, modal).await,
        Interaction::Command(command) => command::handle_command(state, &ctx, command).await,
        _ => {}
    }
}

/// Response showing `text` to the acting user only.
pub fn ephemeral(text: impl Into<String>) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(text)
            .ephemeral(true),
    )
}

/// Guild role ids of the member behind an interaction.
pub fn member_roles(member: Option<&Member>) -> Vec<u64> {
    member
        .map(|member| member.roles.iter().map(|role| role.get()).collect())
        .unwrap_or_default()
}
