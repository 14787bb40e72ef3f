mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use std::sync::Arc;

use serenity::http::Http;

use crate::{
    config::Config,
    error::AppError,
    model::settings::MeetingSettings,
    scheduler::{expiry_queue::ExpiryQueue, meeting_expiry},
    service::{
        bungie::{BungieClient, PlayerStatsSource},
        meeting_notification::{discord::DiscordMeetingSink, MeetingSink},
    },
    state::BotState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;
    let settings = MeetingSettings::from_config(&config);

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client()?;

    // Outbound Discord calls share one HTTP client between handlers and the scheduler
    let discord_http = Arc::new(Http::new(&config.discord_bot_token));
    let sink: Arc<dyn MeetingSink> =
        Arc::new(DiscordMeetingSink::new(discord_http, settings.clone()));

    let bungie = BungieClient::new(http_client, db.clone(), &config);
    let tokens = bungie.token_cache().clone();
    let stats: Arc<dyn PlayerStatsSource> = Arc::new(bungie);

    let expiry_db = db.clone();
    let expiry_sink = sink.clone();
    let expiry = ExpiryQueue::start(move |meeting_id| {
        let db = expiry_db.clone();
        let sink = expiry_sink.clone();
        async move { meeting_expiry::expire_meeting(&db, sink.as_ref(), meeting_id).await }
    });

    // Start meeting expiry scheduler
    let scheduler_db = db.clone();
    let scheduler_expiry = expiry.clone();
    let sweep_interval = settings.sweep_interval;
    tokio::spawn(async move {
        if let Err(e) =
            meeting_expiry::start_scheduler(scheduler_db, scheduler_expiry, tokens, sweep_interval)
                .await
        {
            tracing::error!("Meeting expiry scheduler error: {}", e);
        }
    });

    let state = BotState {
        db,
        sink,
        stats,
        expiry,
        settings,
    };

    bot::start::start_bot(&config, state).await
}
