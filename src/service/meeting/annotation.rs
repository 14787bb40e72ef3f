use crate::{
    data::{
        linked_account::LinkedAccountRepository, meeting_channel::MeetingChannelRepository,
        meeting_member::MeetingMemberRepository,
    },
    error::AppError,
    service::{
        bungie::PlayerStatsSource,
        meeting::{load_meeting, MeetingService},
    },
};

impl<'a> MeetingService<'a> {
    /// Attaches the Bungie name and channel metric of a member to their roster entry.
    ///
    /// Users without a linked account and failed lookups are left unannotated. Only database
    /// errors are returned.
    ///
    /// # Arguments
    /// - `stats` - Game profile source
    /// - `meeting_id` - Meeting the member belongs to
    /// - `user_id` - Discord id of the member
    ///
    /// # Returns
    /// - `Ok(true)` - Profile stored on the roster entry
    /// - `Ok(false)` - No annotation available
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn annotate_member(
        &self,
        stats: &dyn PlayerStatsSource,
        meeting_id: i32,
        user_id: u64,
    ) -> Result<bool, AppError> {
        let Some(bungie_id) = LinkedAccountRepository::new(self.db)
            .find_bungie_id(user_id)
            .await?
        else {
            return Ok(false);
        };

        let meeting = load_meeting(self.db, meeting_id).await?;
        let metric_hashes = MeetingChannelRepository::new(self.db)
            .find_by_channel_id(meeting.channel_id)
            .await?
            .map(|channel| channel.metric_hashes)
            .unwrap_or_default();

        let profile = match stats.player_profile(bungie_id, &metric_hashes).await {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(
                    "No game profile for user {} in meeting {}: {}",
                    user_id,
                    meeting_id,
                    err
                );
                return Ok(false);
            }
        };

        MeetingMemberRepository::new(self.db)
            .set_profile(meeting_id, user_id, &profile)
            .await?;

        Ok(true)
    }
}
