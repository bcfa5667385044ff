pub use sea_orm_migration::prelude::*;

mod m20260801_000001_create_identity;
mod m20260801_000002_create_moderation_state;
mod m20260801_000003_create_entry;
mod m20260801_000004_create_taxonomy;
mod m20260801_000005_create_attribution;
mod m20260801_000006_create_bookmark;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_identity::Migration),
            Box::new(m20260801_000002_create_moderation_state::Migration),
            Box::new(m20260801_000003_create_entry::Migration),
            Box::new(m20260801_000004_create_taxonomy::Migration),
            Box::new(m20260801_000005_create_attribution::Migration),
            Box::new(m20260801_000006_create_bookmark::Migration),
        ]
    }
}
