//! Report site links for roster entries.

use entity::meeting_channel::ActivityResource;

/// Platform slug used by raid.report and dungeon.report.
///
/// # Arguments
/// - `membership_type` - Bungie.net membership type
///
/// # Returns
/// - `Some(slug)` - `xb`, `ps` or `pc`
/// - `None` - Unknown membership type
pub fn platform_slug(membership_type: i32) -> Option<&'static str> {
    match membership_type {
        1 => Some("xb"),
        2 => Some("ps"),
        3 | 4 | 5 | 6 | 10 => Some("pc"),
        _ => None,
    }
}

/// Builds a link to the user's page on the channel's report site.
///
/// # Arguments
/// - `resource` - Report site configured for the channel
/// - `membership_type` - Bungie.net membership type of the profile
/// - `membership_id` - Destiny membership id of the profile
///
/// # Returns
/// - `Some(url)` - Link to the profile
/// - `None` - The site needs a platform slug and the membership type is unknown
pub fn report_url(
    resource: ActivityResource,
    membership_type: i32,
    membership_id: i64,
) -> Option<String> {
    let url = match resource {
        ActivityResource::RaidReport => format!(
            "https://raid.report/{}/{}",
            platform_slug(membership_type)?,
            membership_id
        ),
        ActivityResource::DungeonReport => format!(
            "https://dungeon.report/{}/{}",
            platform_slug(membership_type)?,
            membership_id
        ),
        ActivityResource::CrucibleReport => {
            format!("https://crucible.report/{}/{}", membership_type, membership_id)
        }
        ActivityResource::TrialsReport => format!(
            "https://trials.report/report/{}/{}",
            membership_type, membership_id
        ),
        ActivityResource::NightfallReport => format!(
            "https://nightfall.report/guardian/{}/{}",
            membership_type, membership_id
        ),
        ActivityResource::TriumphReport => {
            format!("https://triumph.report/{}/{}", membership_type, membership_id)
        }
        ActivityResource::DestinyTracker => format!(
            "https://destinytracker.com/destiny-2/profile/{}/{}",
            membership_type, membership_id
        ),
    };

    Some(url)
}

/// Display name of a report site.
pub fn resource_name(resource: ActivityResource) -> &'static str {
    match resource {
        ActivityResource::RaidReport => "RaidReport",
        ActivityResource::DungeonReport => "DungeonReport",
        ActivityResource::CrucibleReport => "CrucibleReport",
        ActivityResource::TrialsReport => "TrialsReport",
        ActivityResource::NightfallReport => "NightfallReport",
        ActivityResource::TriumphReport => "TriumphReport",
        ActivityResource::DestinyTracker => "DestinyTracker",
    }
}

/// Reads a report site from its slash command choice value.
pub fn parse_resource(value: &str) -> Option<ActivityResource> {
    match value {
        "raid_report" => Some(ActivityResource::RaidReport),
        "dungeon_report" => Some(ActivityResource::DungeonReport),
        "crucible_report" => Some(ActivityResource::CrucibleReport),
        "trials_report" => Some(ActivityResource::TrialsReport),
        "nightfall_report" => Some(ActivityResource::NightfallReport),
        "triumph_report" => Some(ActivityResource::TriumphReport),
        "destiny_tracker" => Some(ActivityResource::DestinyTracker),
        _ => None,
    }
}

/// Link comparing every given profile on guardian.report.
pub fn guardian_report_url(membership_ids: &[i64]) -> Option<String> {
    if membership_ids.is_empty() {
        return None;
    }

    let ids = membership_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");

    Some(format!("https://guardian.report/?guardians={}", ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that PC platforms share one raid.report slug.
    ///
    /// Expected: "pc" for Steam, Epic and others; None for unknown types
    #[test]
    fn maps_platform_slugs() {
        assert_eq!(platform_slug(1), Some("xb"));
        assert_eq!(platform_slug(2), Some("ps"));
        assert_eq!(platform_slug(3), Some("pc"));
        assert_eq!(platform_slug(6), Some("pc"));
        assert_eq!(platform_slug(7), None);
    }

    /// Tests raid.report links use the platform slug.
    ///
    /// Expected: https://raid.report/pc/{id}
    #[test]
    fn builds_raid_report_link() {
        assert_eq!(
            report_url(ActivityResource::RaidReport, 3, 4611686018467284386).as_deref(),
            Some("https://raid.report/pc/4611686018467284386")
        );
    }

    /// Tests that slug based sites produce no link for unknown platforms.
    ///
    /// Expected: None for dungeon.report with membership type 7
    #[test]
    fn skips_link_for_unknown_platform() {
        assert_eq!(report_url(ActivityResource::DungeonReport, 7, 1), None);
    }

    /// Tests sites keyed by numeric membership type.
    ///
    /// Expected: Membership type embedded in the path
    #[test]
    fn builds_numeric_type_links() {
        assert_eq!(
            report_url(ActivityResource::TrialsReport, 2, 42).as_deref(),
            Some("https://trials.report/report/2/42")
        );
        assert_eq!(
            report_url(ActivityResource::DestinyTracker, 3, 42).as_deref(),
            Some("https://destinytracker.com/destiny-2/profile/3/42")
        );
    }

    /// Tests guardian.report links for a whole roster.
    ///
    /// Expected: Comma separated ids, None for an empty roster
    #[test]
    fn builds_guardian_report_link() {
        assert_eq!(
            guardian_report_url(&[1, 2]).as_deref(),
            Some("https://guardian.report/?guardians=1,2")
        );
        assert_eq!(guardian_report_url(&[]), None);
    }
}
