use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

pub struct BungieTokenRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> BungieTokenRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets the stored refresh token of a Bungie.net account if it has not expired.
    ///
    /// # Arguments
    /// - `bungie_id` - Bungie.net membership id
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(Some(refresh_token))` - Usable refresh token
    /// - `Ok(None)` - No token stored or the stored one expired
    /// - `Err(DbErr)` - Database error
    pub async fn find_refresh_token(
        &self,
        bungie_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, DbErr> {
        let token = entity::prelude::BungieToken::find_by_id(bungie_id)
            .one(self.db)
            .await?;

        Ok(token
            .filter(|token| token.refresh_expires_at > now)
            .map(|token| token.refresh_token))
    }

    /// Replaces the refresh token after Bungie.net rotated it.
    pub async fn update_refresh_token(
        &self,
        bungie_id: i64,
        refresh_token: String,
        refresh_expires_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        entity::prelude::BungieToken::update_many()
            .set(entity::bungie_token::ActiveModel {
                refresh_token: ActiveValue::Set(refresh_token),
                refresh_expires_at: ActiveValue::Set(refresh_expires_at),
                ..Default::default()
            })
            .filter(entity::bungie_token::Column::BungieId.eq(bungie_id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
