//! Game profile data attached to roster entries.

/// Main Destiny 2 profile of a linked user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    /// Bungie name in `name#code` form.
    pub display_name: String,
    pub membership_id: i64,
    pub membership_type: i32,
    /// Sum of the requested metric objectives, if any were requested and readable.
    pub metric_value: Option<i64>,
}
