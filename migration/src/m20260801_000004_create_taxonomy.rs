//! Migration to create tag, issue, and help_type tables plus their
//! entry join tables.
//!
//! Unique name constraints back the get-or-create upserts; the join
//! tables carry unique (entry, x) pairs so links are idempotent.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create_named_table<T>(manager: &SchemaManager<'_>, table: T, with_description: bool) -> Result<(), DbErr>
where
    T: Iden + Copy + 'static,
{
    let mut def = Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(NamedColumn::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(NamedColumn::Name)
                .string()
                .not_null()
                .unique_key(),
        )
        .to_owned();

    if with_description {
        def.col(ColumnDef::new(NamedColumn::Description).string());
    }

    manager.create_table(def).await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_named_table(manager, Taxonomy::Tag, false).await?;
        create_named_table(manager, Taxonomy::Issue, true).await?;
        create_named_table(manager, Taxonomy::HelpType, true).await?;

        manager
            .create_table(
                Table::create()
                    .table(EntryTag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EntryTag::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EntryTag::EntryId).integer().not_null())
                    .col(ColumnDef::new(EntryTag::TagId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_tag_entry")
                            .from(EntryTag::Table, EntryTag::EntryId)
                            .to(EntryIden::Table, EntryIden::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_tag_tag")
                            .from(EntryTag::Table, EntryTag::TagId)
                            .to(Taxonomy::Tag, NamedColumn::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uk_entry_tag_pair")
                    .table(EntryTag::Table)
                    .col(EntryTag::EntryId)
                    .col(EntryTag::TagId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EntryIssue::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EntryIssue::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EntryIssue::EntryId).integer().not_null())
                    .col(ColumnDef::new(EntryIssue::IssueId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_issue_entry")
                            .from(EntryIssue::Table, EntryIssue::EntryId)
                            .to(EntryIden::Table, EntryIden::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_issue_issue")
                            .from(EntryIssue::Table, EntryIssue::IssueId)
                            .to(Taxonomy::Issue, NamedColumn::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uk_entry_issue_pair")
                    .table(EntryIssue::Table)
                    .col(EntryIssue::EntryId)
                    .col(EntryIssue::IssueId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EntryHelpType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EntryHelpType::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EntryHelpType::EntryId).integer().not_null())
                    .col(
                        ColumnDef::new(EntryHelpType::HelpTypeId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_help_type_entry")
                            .from(EntryHelpType::Table, EntryHelpType::EntryId)
                            .to(EntryIden::Table, EntryIden::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entry_help_type_help_type")
                            .from(EntryHelpType::Table, EntryHelpType::HelpTypeId)
                            .to(Taxonomy::HelpType, NamedColumn::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uk_entry_help_type_pair")
                    .table(EntryHelpType::Table)
                    .col(EntryHelpType::EntryId)
                    .col(EntryHelpType::HelpTypeId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Table::drop().table(EntryHelpType::Table).to_owned(),
            Table::drop().table(EntryIssue::Table).to_owned(),
            Table::drop().table(EntryTag::Table).to_owned(),
            Table::drop().table(Taxonomy::HelpType).to_owned(),
            Table::drop().table(Taxonomy::Issue).to_owned(),
            Table::drop().table(Taxonomy::Tag).to_owned(),
        ] {
            manager.drop_table(table).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Taxonomy {
    Tag,
    Issue,
    HelpType,
}

#[derive(DeriveIden)]
enum NamedColumn {
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum EntryTag {
    Table,
    Id,
    EntryId,
    TagId,
}

#[derive(DeriveIden)]
enum EntryIssue {
    Table,
    Id,
    EntryId,
    IssueId,
}

#[derive(DeriveIden)]
enum EntryHelpType {
    Table,
    Id,
    EntryId,
    HelpTypeId,
}

#[derive(DeriveIden)]
enum EntryIden {
    #[sea_orm(iden = "entry")]
    Table,
    Id,
}
