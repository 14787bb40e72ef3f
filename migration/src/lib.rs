pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_meeting_channel_table;
mod m20260301_000002_create_meeting_table;
mod m20260301_000003_create_meeting_member_table;
mod m20260301_000004_create_linked_account_table;
mod m20260301_000005_create_bungie_token_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_meeting_channel_table::Migration),
            Box::new(m20260301_000002_create_meeting_table::Migration),
            Box::new(m20260301_000003_create_meeting_member_table::Migration),
            Box::new(m20260301_000004_create_linked_account_table::Migration),
            Box::new(m20260301_000005_create_bungie_token_table::Migration),
        ]
    }
}
