//! Test double for `PlayerStatsSource`.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    error::bungie::BungieError, model::bungie::PlayerProfile,
    service::bungie::PlayerStatsSource,
};

/// Answers profile lookups from a fixed table. Unknown ids fail like an unreachable API.
#[derive(Default)]
pub struct FakeStatsSource {
    profiles: HashMap<i64, PlayerProfile>,
}

impl FakeStatsSource {
    pub fn with_profile(mut self, bungie_id: i64, profile: PlayerProfile) -> Self {
        self.profiles.insert(bungie_id, profile);
        self
    }
}

#[async_trait]
impl PlayerStatsSource for FakeStatsSource {
    async fn player_profile(
        &self,
        bungie_id: i64,
        _metric_hashes: &[u32],
    ) -> Result<PlayerProfile, BungieError> {
        self.profiles
            .get(&bungie_id)
            .cloned()
            .ok_or_else(|| BungieError::UnexpectedResponse(format!("no profile for {}", bungie_id)))
    }
}
