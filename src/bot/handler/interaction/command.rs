//! Slash command `/meetings category add`.
//!
//! Registers the channel the command is used in as a meeting channel (or updates it) and posts
//! the channel's "Create meeting" message. Only administrators see the command.

use entity::meeting_channel::ActivityResource;
use sea_orm::{ActiveEnum, Iterable};
use serenity::all::{
    ChannelId, CommandDataOption, CommandDataOptionValue, CommandInteraction, CommandOptionType,
    Context, CreateCommand, CreateCommandOption, CreateMessage, EditInteractionResponse,
    MessageId, Permissions,
};

use crate::{
    data::meeting_channel::MeetingChannelRepository,
    error::AppError,
    model::{
        activity::{parse_resource, resource_name},
        meeting_channel::UpsertMeetingChannelParams,
    },
    service::meeting_notification::builder::build_channel_init,
    state::BotState,
};

pub const COMMAND_NAME: &str = "meetings";

/// Largest fireteam a channel can be configured for.
const MAX_FIRETEAM_SIZE: i64 = 12;

/// Definition of the `/meetings` command.
pub fn register() -> CreateCommand {
    let mut resource = CreateCommandOption::new(
        CommandOptionType::String,
        "resource",
        "Report site linked from roster entries",
    );
    for activity in ActivityResource::iter() {
        resource = resource.add_string_choice(resource_name(activity), activity.to_value());
    }

    let add = CreateCommandOption::new(
        CommandOptionType::SubCommand,
        "add",
        "Set up this channel for meetings",
    )
    .add_sub_option(
        CreateCommandOption::new(CommandOptionType::String, "name", "Activity name").required(true),
    )
    .add_sub_option(
        CreateCommandOption::new(
            CommandOptionType::Integer,
            "max_members",
            "Largest fireteam allowed",
        )
        .min_int_value(1)
        .max_int_value(MAX_FIRETEAM_SIZE as u64)
        .required(true),
    )
    .add_sub_option(
        CreateCommandOption::new(
            CommandOptionType::Integer,
            "default_members",
            "Fireteam size suggested in the creation form",
        )
        .min_int_value(1)
        .max_int_value(MAX_FIRETEAM_SIZE as u64),
    )
    .add_sub_option(CreateCommandOption::new(
        CommandOptionType::Channel,
        "planned_channel",
        "Channel receiving meetings that start later",
    ))
    .add_sub_option(CreateCommandOption::new(
        CommandOptionType::String,
        "description",
        "Text of the channel's create message",
    ))
    .add_sub_option(CreateCommandOption::new(
        CommandOptionType::String,
        "custom_text",
        "Text posted with every meeting, e.g. a role mention",
    ))
    .add_sub_option(CreateCommandOption::new(
        CommandOptionType::String,
        "icon_url",
        "Thumbnail of the channel's meetings",
    ))
    .add_sub_option(resource)
    .add_sub_option(CreateCommandOption::new(
        CommandOptionType::String,
        "metric_hashes",
        "Comma separated Bungie metric hashes summed per member",
    ));

    CreateCommand::new(COMMAND_NAME)
        .description("Meeting administration")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommandGroup,
                "category",
                "Meeting channels",
            )
            .add_sub_option(add),
        )
}

/// Handles a slash command.
pub async fn handle_command(state: &BotState, ctx: &Context, command: CommandInteraction) {
    if command.data.name != COMMAND_NAME {
        return;
    }

    if let Err(e) = command.defer_ephemeral(&ctx.http).await {
        tracing::warn!("Failed to acknowledge command of {}: {}", command.user.id, e);
        return;
    }

    let text = match subcommand_options(&command.data.options, "category", "add") {
        Some(options) => add_category(state, ctx, &command, options)
            .await
            .unwrap_or_else(|e| e.user_message()),
        None => "Unknown command.".to_string(),
    };

    if let Err(e) = command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(text))
        .await
    {
        tracing::warn!("Failed to answer command of {}: {}", command.user.id, e);
    }
}

/// Registers the command's channel and posts its "Create meeting" message.
///
/// A create message posted earlier for the same channel is removed.
async fn add_category(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
    options: &[CommandDataOption],
) -> Result<String, AppError> {
    let Some(name) = string_option(options, "name") else {
        return Ok("A name is required.".to_string());
    };
    let max_members_count = int_option(options, "max_members")
        .unwrap_or(1)
        .clamp(1, MAX_FIRETEAM_SIZE) as i32;
    let default_members_count = int_option(options, "default_members")
        .map(|value| value.clamp(1, max_members_count as i64) as i32)
        .unwrap_or(max_members_count);
    let metric_hashes = match string_option(options, "metric_hashes") {
        Some(value) => match parse_metric_hashes(&value) {
            Some(hashes) => hashes,
            None => return Ok("Metric hashes must be comma separated numbers.".to_string()),
        },
        None => Vec::new(),
    };

    let channel_id = command.channel_id.get();
    let repo = MeetingChannelRepository::new(&state.db);

    let previous_message = repo
        .find_by_channel_id(channel_id)
        .await?
        .and_then(|channel| channel.create_meeting_message_id);

    let channel = repo
        .upsert(UpsertMeetingChannelParams {
            channel_id,
            planned_channel_id: options
                .iter()
                .find(|option| option.name == "planned_channel")
                .and_then(|option| option.value.as_channel_id())
                .map(|id| id.get()),
            name,
            description: string_option(options, "description"),
            custom_meeting_text: string_option(options, "custom_text"),
            icon_url: string_option(options, "icon_url"),
            default_members_count,
            max_members_count,
            activity_type: string_option(options, "resource")
                .and_then(|value| parse_resource(&value)),
            metric_hashes,
        })
        .await?;

    let (embed, components) = build_channel_init(&channel);
    let message = ChannelId::new(channel.channel_id)
        .send_message(
            &ctx.http,
            CreateMessage::new().embed(embed).components(components),
        )
        .await?;
    repo.set_create_meeting_message(channel.channel_id, message.id.get())
        .await?;

    if let Some(previous) = previous_message {
        if let Err(e) = ctx
            .http
            .delete_message(
                ChannelId::new(channel.channel_id),
                MessageId::new(previous),
                None,
            )
            .await
        {
            tracing::warn!(
                "Failed to delete previous create message {} in channel {}: {}",
                previous,
                channel.channel_id,
                e
            );
        }
    }

    tracing::info!(
        "Channel {} ({}) configured for meetings by {}",
        channel.name,
        channel.channel_id,
        command.user.id
    );

    Ok(format!("Meetings are set up in <#{}>.", channel.channel_id))
}

/// Options of a subcommand inside a subcommand group.
fn subcommand_options<'a>(
    options: &'a [CommandDataOption],
    group: &str,
    subcommand: &str,
) -> Option<&'a [CommandDataOption]> {
    let CommandDataOptionValue::SubCommandGroup(subcommands) =
        &options.iter().find(|option| option.name == group)?.value
    else {
        return None;
    };
    let CommandDataOptionValue::SubCommand(options) =
        &subcommands.iter().find(|option| option.name == subcommand)?.value
    else {
        return None;
    };

    Some(options)
}

fn string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn int_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_i64())
}

/// Reads a comma separated list of metric hashes; `None` if any entry is not a hash.
fn parse_metric_hashes(value: &str) -> Option<Vec<u32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u32>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests reading metric hashes typed by an administrator.
    ///
    /// Expected: hashes in order with blanks skipped, None for a malformed entry
    #[test]
    fn parses_metric_hashes() {
        assert_eq!(
            parse_metric_hashes("1765255052, 2082314848,"),
            Some(vec![1765255052, 2082314848])
        );
        assert_eq!(parse_metric_hashes("12,abc"), None);
    }
}
