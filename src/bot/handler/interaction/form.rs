//! Forms opened by meeting buttons and readers for their submitted values.

use serenity::all::{
    ActionRowComponent, CreateActionRow, CreateInputText, CreateModal, InputTextStyle,
    ModalInteraction,
};

use crate::{
    model::{
        custom_id::{create_modal_id, FormAction},
        meeting::Meeting,
        meeting_channel::MeetingChannel,
    },
    service::meeting::MAX_COMMENT_LENGTH,
};

pub const DESCRIPTION_INPUT: &str = "description";
pub const SIZE_INPUT: &str = "size";
pub const START_INPUT: &str = "start";
pub const TARGET_INPUT: &str = "target";
pub const REASON_INPUT: &str = "reason";
pub const MESSAGE_INPUT: &str = "message";

/// Form creating a meeting in `channel`.
pub fn create_form(channel: &MeetingChannel) -> CreateModal {
    CreateModal::new(create_modal_id(channel.channel_id), "New meeting").components(vec![
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Paragraph, "Description", DESCRIPTION_INPUT)
                .max_length(MAX_COMMENT_LENGTH as u16)
                .required(false),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(
                InputTextStyle::Short,
                format!("Fireteam size (1-{})", channel.max_members_count),
                SIZE_INPUT,
            )
            .value(channel.default_members_count.to_string())
            .max_length(2),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Short, "Start time (DD.MM-HH:MM)", START_INPUT)
                .placeholder("Leave empty to start now")
                .max_length(11)
                .required(false),
        ),
    ])
}

/// Form collecting the input of a meeting action, prefilled from the meeting.
pub fn action_form(action: FormAction, meeting: &Meeting) -> CreateModal {
    let (title, inputs) = match action {
        FormAction::Notify => (
            "Message the fireteam",
            vec![paragraph("Message", MESSAGE_INPUT)],
        ),
        FormAction::Kick => (
            "Kick a member",
            vec![target_input(), paragraph("Reason", REASON_INPUT)],
        ),
        FormAction::Ban => (
            "Ban a member",
            vec![target_input(), paragraph("Reason", REASON_INPUT)],
        ),
        FormAction::Description => (
            "Change description",
            vec![{
                let mut input = paragraph("Description", DESCRIPTION_INPUT)
                    .max_length(MAX_COMMENT_LENGTH as u16);
                if let Some(comment) = &meeting.comment {
                    input = input.value(comment);
                }
                input
            }],
        ),
        FormAction::Size => (
            "Change fireteam size",
            vec![CreateInputText::new(InputTextStyle::Short, "Fireteam size", SIZE_INPUT)
                .value(meeting.fireteam_max.to_string())
                .max_length(2)],
        ),
        FormAction::Leader => ("Hand over leadership", vec![target_input()]),
        FormAction::Cancel => (
            "Cancel meeting",
            vec![paragraph("Reason", REASON_INPUT)],
        ),
    };

    CreateModal::new(action.modal_id(meeting.id), title).components(
        inputs
            .into_iter()
            .map(CreateActionRow::InputText)
            .collect(),
    )
}

fn paragraph(label: &str, custom_id: &str) -> CreateInputText {
    CreateInputText::new(InputTextStyle::Paragraph, label, custom_id)
}

fn target_input() -> CreateInputText {
    CreateInputText::new(InputTextStyle::Short, "Roster number or user id", TARGET_INPUT)
        .max_length(32)
}

/// Value typed into a form field. Missing or empty fields read as an empty string.
pub fn input_value(modal: &ModalInteraction, custom_id: &str) -> String {
    modal
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == custom_id => {
                Some(input.value.clone().unwrap_or_default())
            }
            _ => None,
        })
        .unwrap_or_default()
}
