//! Bungie.net client used to annotate roster entries.
//!
//! The meeting engine only depends on the `PlayerStatsSource` trait. `BungieClient` is the
//! production implementation; it reads public profile data with the application API key and
//! attaches a user access token when the user linked their account through OAuth.

pub mod auth_cache;
pub mod response;

#[cfg(test)]
pub mod fake;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    data::bungie_token::BungieTokenRepository,
    error::bungie::BungieError,
    model::bungie::PlayerProfile,
    service::bungie::{
        auth_cache::AuthTokenCache,
        response::{
            PlatformResponse, ProfileResponse, TokenResponse, UserMemberships, PLATFORM_SUCCESS,
        },
    },
};

/// Membership type addressing a Bungie.net account rather than a game platform.
const BUNGIE_NEXT_MEMBERSHIP_TYPE: i32 = 254;

/// Profile component carrying metric progress.
const METRICS_COMPONENT: u32 = 1100;

/// Source of game profile data for roster entries.
#[async_trait]
pub trait PlayerStatsSource: Send + Sync {
    /// Looks up the main Destiny 2 profile of a Bungie.net account.
    ///
    /// # Arguments
    /// - `bungie_id` - Bungie.net membership id
    /// - `metric_hashes` - Metrics to sum into `metric_value`; empty skips the metrics lookup
    ///
    /// # Returns
    /// - `Ok(PlayerProfile)` - Profile of the account
    /// - `Err(BungieError)` - Lookup failed
    async fn player_profile(
        &self,
        bungie_id: i64,
        metric_hashes: &[u32],
    ) -> Result<PlayerProfile, BungieError>;
}

#[derive(Clone)]
pub struct BungieClient {
    http_client: reqwest::Client,
    db: DatabaseConnection,
    tokens: AuthTokenCache,
    api_url: String,
    token_url: String,
    api_key: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl BungieClient {
    pub fn new(http_client: reqwest::Client, db: DatabaseConnection, config: &Config) -> Self {
        Self {
            http_client,
            db,
            tokens: AuthTokenCache::new(),
            api_url: config.bungie_api_url.trim_end_matches('/').to_string(),
            token_url: config.bungie_token_url.clone(),
            api_key: config.bungie_api_key.clone(),
            client_id: config.bungie_client_id.clone(),
            client_secret: config.bungie_client_secret.clone(),
        }
    }

    /// Access token cache shared with the scheduler's eviction job.
    pub fn token_cache(&self) -> &AuthTokenCache {
        &self.tokens
    }

    /// Gets an access token for the account, refreshing it through OAuth if needed.
    ///
    /// # Returns
    /// - `Ok(Some(token))` - Cached or freshly refreshed access token
    /// - `Ok(None)` - The account has no usable refresh token
    /// - `Err(BungieError)` - Refresh request failed
    async fn access_token(&self, bungie_id: i64) -> Result<Option<String>, BungieError> {
        if let Some(token) = self.tokens.get(bungie_id).await {
            return Ok(Some(token));
        }

        let (Some(client_id), Some(client_secret)) = (&self.client_id, &self.client_secret)
        else {
            return Ok(None);
        };

        let repo = BungieTokenRepository::new(&self.db);
        let Some(refresh_token) = repo.find_refresh_token(bungie_id, Utc::now()).await? else {
            return Ok(None);
        };

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<TokenResponse>()
            .await?;

        if let (Some(refresh_token), Some(expires_in)) =
            (response.refresh_token, response.refresh_expires_in)
        {
            repo.update_refresh_token(
                bungie_id,
                refresh_token,
                Utc::now() + chrono::Duration::seconds(expires_in),
            )
            .await?;
        }

        self.tokens
            .put(
                bungie_id,
                response.access_token.clone(),
                Duration::from_secs(response.expires_in),
            )
            .await;

        tracing::debug!("Refreshed Bungie.net access token for {}", bungie_id);

        Ok(Some(response.access_token))
    }

    /// Sends a GET request to the platform API and unwraps the response envelope.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: Option<&str>,
    ) -> Result<T, BungieError> {
        let mut request = self
            .http_client
            .get(format!("{}{}", self.api_url, path))
            .header("X-API-Key", self.api_key.as_str());
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        let envelope = request
            .send()
            .await?
            .json::<PlatformResponse<T>>()
            .await?;

        if envelope.error_code != PLATFORM_SUCCESS {
            return Err(BungieError::Platform {
                status: envelope.error_status,
                message: envelope.message,
            });
        }

        envelope
            .response
            .ok_or_else(|| BungieError::UnexpectedResponse(format!("{} had no Response", path)))
    }
}

#[async_trait]
impl PlayerStatsSource for BungieClient {
    async fn player_profile(
        &self,
        bungie_id: i64,
        metric_hashes: &[u32],
    ) -> Result<PlayerProfile, BungieError> {
        let access_token = match self.access_token(bungie_id).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(
                    "Failed to refresh Bungie.net token for {}, using public data: {}",
                    bungie_id,
                    err
                );
                None
            }
        };

        let memberships: UserMemberships = self
            .get(
                &format!(
                    "/User/GetMembershipsById/{}/{}/",
                    bungie_id, BUNGIE_NEXT_MEMBERSHIP_TYPE
                ),
                access_token.as_deref(),
            )
            .await?;

        let main = memberships.main_membership().cloned().ok_or_else(|| {
            BungieError::UnexpectedResponse(format!("{} has no Destiny membership", bungie_id))
        })?;
        let display_name = memberships.display_name().ok_or_else(|| {
            BungieError::UnexpectedResponse(format!("{} has no Bungie name", bungie_id))
        })?;

        let metric_value = if metric_hashes.is_empty() {
            None
        } else {
            let profile: ProfileResponse = self
                .get(
                    &format!(
                        "/Destiny2/{}/Profile/{}/?components={}",
                        main.membership_type, main.membership_id, METRICS_COMPONENT
                    ),
                    access_token.as_deref(),
                )
                .await?;

            profile
                .metrics
                .and_then(|metrics| metrics.data)
                .and_then(|metrics| metrics.total(metric_hashes))
        };

        Ok(PlayerProfile {
            display_name,
            membership_id: main.membership_id,
            membership_type: main.membership_type,
            metric_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;
    use test_utils::{builder::TestBuilder, factory};

    use super::*;

    fn config(client_id: Option<&str>, client_secret: Option<&str>) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            discord_bot_token: "token".to_string(),
            discord_guild_id: 1,
            meetings_log_channel_id: None,
            meetings_notify_log_channel_id: None,
            meetings_notifier_role_ids: Vec::new(),
            meetings_sweep_interval_minutes: 10,
            meetings_utc_offset_hours: 3,
            bungie_api_key: "key".to_string(),
            bungie_client_id: client_id.map(str::to_string),
            bungie_client_secret: client_secret.map(str::to_string),
            // Nothing listens here, so a stray request fails the test
            bungie_api_url: "http://127.0.0.1:9".to_string(),
            bungie_token_url: "http://127.0.0.1:9/token".to_string(),
        }
    }

    /// Tests token lookup when the OAuth client is not configured.
    ///
    /// Expected: no access token and no error, even for an account with a refresh token
    #[tokio::test]
    async fn skips_oauth_without_client_credentials() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_account_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        factory::create_linked_account(db, "1001", 4611686018400000001).await?;
        factory::create_bungie_token(db, "1001", 4611686018400000001, "refresh").await?;

        for (client_id, client_secret) in [(None, None), (Some("id"), None), (None, Some("secret"))]
        {
            let client = BungieClient::new(
                reqwest::Client::new(),
                db.clone(),
                &config(client_id, client_secret),
            );

            let token = client.access_token(4611686018400000001).await;
            assert!(matches!(token, Ok(None)));
        }

        Ok(())
    }

    /// Tests that a cached access token is used without touching OAuth.
    ///
    /// Expected: cached token returned while the token endpoint is unreachable
    #[tokio::test]
    async fn prefers_cached_access_token() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_account_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let client = BungieClient::new(
            reqwest::Client::new(),
            db.clone(),
            &config(Some("id"), Some("secret")),
        );
        client
            .token_cache()
            .put(7, "cached".to_string(), Duration::from_secs(60))
            .await;

        let token = client.access_token(7).await;
        assert!(matches!(token.as_ref().map(Option::as_deref), Ok(Some("cached"))));

        Ok(())
    }
}
