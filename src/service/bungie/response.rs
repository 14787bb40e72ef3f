//! Bungie.net response payloads, reduced to the fields the bot reads.

use std::collections::HashMap;

use serde::Deserialize;

/// Envelope wrapped around every Bungie.net platform response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlatformResponse<T> {
    pub response: Option<T>,
    pub error_code: i32,
    pub error_status: String,
    #[serde(default)]
    pub message: String,
}

/// `ErrorCode` of a successful platform call.
pub const PLATFORM_SUCCESS: i32 = 1;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMemberships {
    pub destiny_memberships: Vec<DestinyMembership>,
    #[serde(default, with = "optional_string_id")]
    pub primary_membership_id: Option<i64>,
    pub bungie_net_user: Option<BungieNetUser>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyMembership {
    #[serde(with = "string_id")]
    pub membership_id: i64,
    pub membership_type: i32,
    pub bungie_global_display_name: Option<String>,
    pub bungie_global_display_name_code: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BungieNetUser {
    pub cached_bungie_global_display_name: Option<String>,
    pub cached_bungie_global_display_name_code: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub metrics: Option<ComponentResponse<MetricsComponent>>,
}

#[derive(Debug, Deserialize)]
pub struct ComponentResponse<T> {
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct MetricsComponent {
    /// Metric hash (as a decimal string) to metric state.
    pub metrics: HashMap<String, MetricState>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricState {
    pub objective_progress: ObjectiveProgress,
}

#[derive(Debug, Deserialize)]
pub struct ObjectiveProgress {
    #[serde(default)]
    pub progress: i64,
}

/// OAuth token endpoint reply.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
    pub refresh_expires_in: Option<i64>,
}

/// Bungie.net sends 64-bit ids as JSON strings.
mod string_id {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

mod optional_string_id {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|value| value.parse().map_err(serde::de::Error::custom))
            .transpose()
    }
}

impl UserMemberships {
    /// Picks the membership the user plays on.
    ///
    /// The primary membership wins for cross-saved accounts. Otherwise a single membership is
    /// used as is, and among several the Steam one.
    pub fn main_membership(&self) -> Option<&DestinyMembership> {
        if let Some(primary) = self.primary_membership_id {
            if let Some(membership) = self
                .destiny_memberships
                .iter()
                .find(|membership| membership.membership_id == primary)
            {
                return Some(membership);
            }
        }

        match self.destiny_memberships.as_slice() {
            [single] => Some(single),
            memberships => memberships
                .iter()
                .find(|membership| membership.membership_type == 3),
        }
    }

    /// Bungie name in `name#0042` form.
    pub fn display_name(&self) -> Option<String> {
        let user = self.bungie_net_user.as_ref();
        let main = self.main_membership();

        let name = user
            .and_then(|user| user.cached_bungie_global_display_name.clone())
            .or_else(|| main.and_then(|main| main.bungie_global_display_name.clone()))?;
        let code = user
            .and_then(|user| user.cached_bungie_global_display_name_code)
            .or_else(|| main.and_then(|main| main.bungie_global_display_name_code))?;

        Some(format!("{}#{:04}", name, code))
    }
}

impl MetricsComponent {
    /// Sums the progress of the requested metrics.
    ///
    /// # Returns
    /// - `Some(total)` - At least one requested metric was present
    /// - `None` - None of the metrics are visible on the profile
    pub fn total(&self, metric_hashes: &[u32]) -> Option<i64> {
        metric_hashes
            .iter()
            .filter_map(|hash| self.metrics.get(&hash.to_string()))
            .map(|metric| metric.objective_progress.progress)
            .fold(None, |total, progress| Some(total.unwrap_or(0) + progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMBERSHIPS: &str = r#"{
        "Response": {
            "destinyMemberships": [
                {"membershipId": "4611686018400000001", "membershipType": 1,
                 "bungieGlobalDisplayName": "Guardian", "bungieGlobalDisplayNameCode": 7},
                {"membershipId": "4611686018400000002", "membershipType": 3,
                 "bungieGlobalDisplayName": "Guardian", "bungieGlobalDisplayNameCode": 7}
            ],
            "primaryMembershipId": "4611686018400000001",
            "bungieNetUser": {"cachedBungieGlobalDisplayName": "Guardian",
                              "cachedBungieGlobalDisplayNameCode": 7}
        },
        "ErrorCode": 1,
        "ErrorStatus": "Success",
        "Message": "Ok"
    }"#;

    /// Tests picking the cross-save primary membership.
    ///
    /// Expected: primary membership chosen over the Steam one, name padded to four digits
    #[test]
    fn picks_primary_membership() {
        let response: PlatformResponse<UserMemberships> =
            serde_json::from_str(MEMBERSHIPS).unwrap();
        let memberships = response.response.unwrap();

        let main = memberships.main_membership().unwrap();
        assert_eq!(main.membership_id, 4611686018400000001);
        assert_eq!(main.membership_type, 1);
        assert_eq!(memberships.display_name().as_deref(), Some("Guardian#0007"));
    }

    /// Tests the fallback to the Steam membership when no primary is set.
    ///
    /// Expected: membership type 3 chosen
    #[test]
    fn falls_back_to_steam_membership() {
        let mut response: PlatformResponse<UserMemberships> =
            serde_json::from_str(MEMBERSHIPS).unwrap();
        let memberships = response.response.as_mut().unwrap();
        memberships.primary_membership_id = None;

        let main = memberships.main_membership().unwrap();
        assert_eq!(main.membership_type, 3);
    }

    /// Tests summing metric progress.
    ///
    /// Expected: present metrics summed, missing ones ignored, nothing present gives None
    #[test]
    fn sums_requested_metrics() {
        let metrics: MetricsComponent = serde_json::from_str(
            r#"{"metrics": {
                "100": {"objectiveProgress": {"progress": 12}},
                "200": {"objectiveProgress": {"progress": 30}}
            }}"#,
        )
        .unwrap();

        assert_eq!(metrics.total(&[100, 200, 300]), Some(42));
        assert_eq!(metrics.total(&[300]), None);
        assert_eq!(metrics.total(&[]), None);
    }
}
