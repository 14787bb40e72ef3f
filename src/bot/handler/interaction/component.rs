//! Button handlers.
//!
//! Meeting buttons carry only their action; the meeting is found through the message the
//! button belongs to, so a button always acts on the meeting it is shown with.

use chrono::Utc;
use serenity::all::{
    ComponentInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseFollowup,
};

use crate::{
    bot::handler::interaction::{ephemeral, form},
    data::meeting_channel::MeetingChannelRepository,
    error::{meeting::MeetingError, AppError},
    model::{
        custom_id::{parse_button_id, ButtonId, FormAction},
        meeting::{MembershipChange, MembershipOutcome},
    },
    service::{meeting::MeetingService, meeting_notification::MeetingNotificationService},
    state::BotState,
};

/// Handles a button press.
///
/// Buttons this module does not own are ignored; the overlap confirmation button is consumed
/// by its collector in the creation flow.
pub async fn handle_component(state: &BotState, ctx: &Context, component: ComponentInteraction) {
    let Some(button) = parse_button_id(&component.data.custom_id) else {
        return;
    };

    let result = match button {
        ButtonId::Create => open_create_form(state, ctx, &component).await,
        ButtonId::Action(action) => match action.form() {
            Some(action) => open_action_form(state, ctx, &component, action).await,
            None => toggle_membership(state, ctx, &component).await,
        },
    };

    if let Err(e) = result {
        let text = e.user_message();

        // A deferred press can no longer be answered with a response, only with a followup.
        if component
            .create_response(&ctx.http, ephemeral(text.clone()))
            .await
            .is_err()
        {
            if let Err(e) = component
                .create_followup(
                    &ctx.http,
                    CreateInteractionResponseFollowup::new()
                        .content(text)
                        .ephemeral(true),
                )
                .await
            {
                tracing::warn!("Failed to report button error to {}: {}", component.user.id, e);
            }
        }
    }
}

async fn open_create_form(
    state: &BotState,
    ctx: &Context,
    component: &ComponentInteraction,
) -> Result<(), AppError> {
    let channel = MeetingChannelRepository::new(&state.db)
        .find_by_channel_id(component.channel_id.get())
        .await?
        .ok_or(MeetingError::ChannelNotConfigured)?;

    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Modal(form::create_form(&channel)),
        )
        .await?;

    Ok(())
}

/// Joins or leaves the meeting of the pressed message.
///
/// The press is acknowledged without a reply; the updated roster is the visible result.
async fn toggle_membership(
    state: &BotState,
    ctx: &Context,
    component: &ComponentInteraction,
) -> Result<(), AppError> {
    component.defer(&ctx.http).await?;

    let service = MeetingService::new(&state.db);
    let meeting = service.get_by_message(component.message.id.get()).await?;
    let outcome = service
        .toggle_membership(meeting.id, component.user.id.get(), Utc::now())
        .await?;

    MeetingNotificationService::new(&state.db, state.sink.as_ref())
        .refresh(meeting.id)
        .await;

    tokio::spawn(after_toggle(state.clone(), outcome));

    Ok(())
}

/// Notifications and roster annotation following a committed toggle.
async fn after_toggle(state: BotState, outcome: MembershipOutcome) {
    let notifications = MeetingNotificationService::new(&state.db, state.sink.as_ref());

    if outcome.completed() {
        notifications.completed(&outcome.meeting).await;
    }
    if outcome.reopened() {
        notifications
            .reopened(&outcome.meeting, outcome.user_id)
            .await;
    }

    if outcome.change == (MembershipChange::Joined { first_time: true }) {
        match MeetingService::new(&state.db)
            .annotate_member(state.stats.as_ref(), outcome.meeting.id, outcome.user_id)
            .await
        {
            Ok(true) => notifications.refresh(outcome.meeting.id).await,
            Ok(false) => {}
            Err(e) => tracing::error!(
                "Failed to annotate {} in meeting {}: {}",
                outcome.user_id,
                outcome.meeting.id,
                e
            ),
        }
    }
}

/// Opens the form of a meeting action.
///
/// Leader-only actions are refused up front so other users never see their forms; the
/// operation checks leadership again when the form is submitted.
async fn open_action_form(
    state: &BotState,
    ctx: &Context,
    component: &ComponentInteraction,
    action: FormAction,
) -> Result<(), AppError> {
    let service = MeetingService::new(&state.db);
    let meeting = service.get_by_message(component.message.id.get()).await?;

    if meeting.status.is_terminal() {
        return Err(MeetingError::MeetingOver.into());
    }
    if action != FormAction::Notify
        && service.leader_of(meeting.id).await? != Some(component.user.id.get())
    {
        return Err(MeetingError::NotLeader.into());
    }

    let modal = form::action_form(action, &meeting);

    component
        .create_response(&ctx.http, CreateInteractionResponse::Modal(modal))
        .await?;

    Ok(())
}
