//! Form submission handlers.
//!
//! Submissions are deferred right away and answered by editing the deferred response, since
//! notifying a fireteam can take longer than Discord waits for an initial reply.

use chrono::Utc;
use serenity::all::{Context, EditInteractionResponse, ModalInteraction};

use crate::{
    bot::handler::interaction::{create, form, member_roles},
    error::AppError,
    model::custom_id::{parse_modal_id, FormAction, ModalId},
    service::{
        meeting::MeetingService,
        meeting_notification::{AnnouncementReport, MeetingNotificationService},
    },
    state::BotState,
    util::parse::parse_fireteam_size,
};

/// Handles a submitted meeting form.
pub async fn handle_modal(state: &BotState, ctx: &Context, modal: ModalInteraction) {
    let Some(modal_id) = parse_modal_id(&modal.data.custom_id) else {
        return;
    };

    if let Err(e) = modal.defer_ephemeral(&ctx.http).await {
        tracing::warn!("Failed to acknowledge form {}: {}", modal.data.custom_id, e);
        return;
    }

    let result = match modal_id {
        ModalId::Create { channel_id } => {
            create::create_meeting(state, ctx, &modal, channel_id).await
        }
        ModalId::Action { action, meeting_id } => {
            submit_action(state, &modal, action, meeting_id).await
        }
    };
    let text = result.unwrap_or_else(|e| e.user_message());

    if let Err(e) = modal
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new()
                .content(text)
                .components(vec![]),
        )
        .await
    {
        tracing::warn!("Failed to answer form {}: {}", modal.data.custom_id, e);
    }
}

/// Runs the operation of an action form.
///
/// # Returns
/// - `Ok(String)` - Confirmation shown to the acting user
/// - `Err(AppError)` - The operation was rejected or failed
async fn submit_action(
    state: &BotState,
    modal: &ModalInteraction,
    action: FormAction,
    meeting_id: i32,
) -> Result<String, AppError> {
    let actor_id = modal.user.id.get();
    let now = Utc::now();
    let service = MeetingService::new(&state.db);
    let notifications = MeetingNotificationService::new(&state.db, state.sink.as_ref());

    match action {
        FormAction::Notify => {
            let announcement = service
                .prepare_announcement(
                    meeting_id,
                    actor_id,
                    &member_roles(modal.member.as_ref()),
                    &state.settings.notifier_role_ids,
                    &form::input_value(modal, form::MESSAGE_INPUT),
                )
                .await?;
            let report = notifications.announce(&announcement).await;

            Ok(report_text(&report))
        }
        FormAction::Kick | FormAction::Ban => {
            let target = form::input_value(modal, form::TARGET_INPUT);
            let reason = form::input_value(modal, form::REASON_INPUT);
            let outcome = if action == FormAction::Kick {
                service
                    .kick(meeting_id, actor_id, &target, &reason, now)
                    .await?
            } else {
                service
                    .ban(meeting_id, actor_id, &target, &reason, now)
                    .await?
            };

            notifications.refresh(meeting_id).await;
            notifications.removed(&outcome).await;

            Ok(format!(
                "<@{}> was removed from the fireteam ({}).",
                outcome.target_id,
                outcome.status.label().to_lowercase()
            ))
        }
        FormAction::Description => {
            service
                .change_description(
                    meeting_id,
                    actor_id,
                    &form::input_value(modal, form::DESCRIPTION_INPUT),
                )
                .await?;
            notifications.refresh(meeting_id).await;

            Ok("Description updated.".to_string())
        }
        FormAction::Size => {
            let size = parse_fireteam_size(&form::input_value(modal, form::SIZE_INPUT))?;
            let outcome = service.resize(meeting_id, actor_id, size, now).await?;

            notifications.refresh(meeting_id).await;
            if outcome.completed {
                notifications.completed(&outcome.meeting).await;
            }

            Ok(format!("Fireteam size set to {}.", outcome.meeting.fireteam_max))
        }
        FormAction::Leader => {
            let transfer = service
                .transfer_leadership(
                    meeting_id,
                    actor_id,
                    &form::input_value(modal, form::TARGET_INPUT),
                    now,
                )
                .await?;

            notifications.refresh(meeting_id).await;
            notifications.leader_assigned(&transfer).await;

            Ok(format!("<@{}> now leads the meeting.", transfer.new_leader_id))
        }
        FormAction::Cancel => {
            let outcome = service
                .cancel(
                    meeting_id,
                    actor_id,
                    &form::input_value(modal, form::REASON_INPUT),
                )
                .await?;
            notifications.canceled(&outcome).await;

            Ok("Meeting canceled.".to_string())
        }
    }
}

/// Delivery summary shown to the sender of an announcement.
pub fn report_text(report: &AnnouncementReport) -> String {
    let mut text = format!("Message delivered to {} member(s).", report.delivered.len());

    if !report.failed.is_empty() {
        let mentions = report
            .failed
            .iter()
            .map(|user_id| format!("<@{}>", user_id))
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!("\nCould not reach: {}", mentions));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests the summary of a partly failed announcement.
    ///
    /// Expected: delivered count and a mention of every unreachable member
    #[test]
    fn reports_unreachable_members() {
        let report = AnnouncementReport {
            delivered: vec![1, 2],
            failed: vec![3, 4],
        };

        assert_eq!(
            report_text(&report),
            "Message delivered to 2 member(s).\nCould not reach: <@3>, <@4>"
        );
    }

    /// Tests the summary of a fully delivered announcement.
    ///
    /// Expected: only the delivered count
    #[test]
    fn reports_full_delivery() {
        let report = AnnouncementReport {
            delivered: vec![1],
            failed: vec![],
        };

        assert_eq!(report_text(&report), "Message delivered to 1 member(s).");
    }
}
