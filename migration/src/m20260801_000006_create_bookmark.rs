//! Migration to create the bookmark ledger.
//!
//! The unique (profile, entry) index makes the toggle race-safe: a
//! concurrent double-insert surfaces as a constraint violation instead
//! of a duplicate row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookmark::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookmark::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookmark::EntryId).integer().not_null())
                    .col(ColumnDef::new(Bookmark::ProfileId).integer().not_null())
                    .col(
                        ColumnDef::new(Bookmark::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookmark_entry")
                            .from(Bookmark::Table, Bookmark::EntryId)
                            .to(Entry::Table, Entry::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookmark_profile")
                            .from(Bookmark::Table, Bookmark::ProfileId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uk_bookmark_profile_entry")
                    .table(Bookmark::Table)
                    .col(Bookmark::ProfileId)
                    .col(Bookmark::EntryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookmark_timestamp")
                    .table(Bookmark::Table)
                    .col(Bookmark::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookmark::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Bookmark {
    Table,
    Id,
    EntryId,
    ProfileId,
    Timestamp,
}

#[derive(DeriveIden)]
enum Entry {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Profile {
    Table,
    Id,
}
