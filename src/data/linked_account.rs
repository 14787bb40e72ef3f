use sea_orm::{ConnectionTrait, DbErr, EntityTrait};

pub struct LinkedAccountRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LinkedAccountRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets the Bungie.net membership id linked to a Discord user.
    ///
    /// # Returns
    /// - `Ok(Some(bungie_id))` - The user linked their account
    /// - `Ok(None)` - No link exists
    /// - `Err(DbErr)` - Database error
    pub async fn find_bungie_id(&self, discord_id: u64) -> Result<Option<i64>, DbErr> {
        let account = entity::prelude::LinkedAccount::find_by_id(discord_id.to_string())
            .one(self.db)
            .await?;

        Ok(account.map(|account| account.bungie_id))
    }
}
