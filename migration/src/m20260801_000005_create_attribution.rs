//! Migration to create the ordered creator-attribution ledger.
//!
//! Row id order within an entry is the display order. The unique
//! (entry, profile) pair suppresses duplicate attribution of the same
//! resolved profile.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EntryCreator::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EntryCreator::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EntryCreator::EntryId).integer().not_null())
                    .col(
                        ColumnDef::new(EntryCreator::ProfileId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_creator_entry")
                            .from(EntryCreator::Table, EntryCreator::EntryId)
                            .to(Entry::Table, Entry::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_creator_profile")
                            .from(EntryCreator::Table, EntryCreator::ProfileId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uk_entry_creator_entry_profile")
                    .table(EntryCreator::Table)
                    .col(EntryCreator::EntryId)
                    .col(EntryCreator::ProfileId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_entry_creator_entry_order")
                    .table(EntryCreator::Table)
                    .col(EntryCreator::EntryId)
                    .col(EntryCreator::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EntryCreator::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EntryCreator {
    Table,
    Id,
    EntryId,
    ProfileId,
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
