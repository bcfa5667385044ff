//! Migration to create and seed moderation states.
//!
//! `Pending` and `Approved` are seeded here so the application never has
//! to branch around their absence at runtime. `Pending` is inserted
//! first: listing order is id ascending and `Pending` comes first by
//! creation-order convention.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModerationState::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModerationState::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ModerationState::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        for name in ["Pending", "Approved"] {
            let insert = Query::insert()
                .into_table(ModerationState::Table)
                .columns([ModerationState::Name])
                .values_panic([name.into()])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModerationState::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ModerationState {
    Table,
    Id,
    Name,
}
