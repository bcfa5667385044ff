//! Migration to create the entry table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entry::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entry::Title).string_len(140).not_null())
                    .col(ColumnDef::new(Entry::ContentUrl).string().not_null())
                    .col(ColumnDef::new(Entry::Description).string())
                    .col(ColumnDef::new(Entry::GetInvolved).string())
                    .col(ColumnDef::new(Entry::GetInvolvedUrl).string())
                    .col(ColumnDef::new(Entry::Interest).string())
                    .col(
                        ColumnDef::new(Entry::Featured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Entry::InternalNotes).text())
                    .col(ColumnDef::new(Entry::Thumbnail).string())
                    .col(ColumnDef::new(Entry::PublishedBy).integer().not_null())
                    .col(
                        ColumnDef::new(Entry::PublishedByCreator)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Entry::ModerationStateId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Entry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_published_by")
                            .from(Entry::Table, Entry::PublishedBy)
                            .to(Account::Table, Account::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_moderation_state")
                            .from(Entry::Table, Entry::ModerationStateId)
                            .to(ModerationState::Table, ModerationState::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_entry_moderation_state")
                    .table(Entry::Table)
                    .col(Entry::ModerationStateId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_entry_created_at")
                    .table(Entry::Table)
                    .col(Entry::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entry::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Entry {
    Table,
    Id,
    Title,
    ContentUrl,
    Description,
    GetInvolved,
    GetInvolvedUrl,
    Interest,
    Featured,
    InternalNotes,
    Thumbnail,
    PublishedBy,
    PublishedByCreator,
    ModerationStateId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ModerationState {
    Table,
    Id,
}
