//! Read-model assembly for entries.
//!
//! A bundle is one entry plus everything its API projection needs:
//! the ordered attribution list, taxonomy names, publisher identity,
//! and bookmark state. Loading is batched over a whole page so a list
//! response does not issue per-entry queries.

use std::collections::HashMap;

use entity::{
    account, bookmark, entry, entry_creator, entry_help_type, entry_issue, entry_tag, help_type,
    issue, profile, tag,
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::modules::creators::Attribution;
use crate::modules::error::ServiceError;

#[derive(Debug, Clone)]
pub struct EntryBundle {
    pub entry: entry::Model,
    pub attributions: Vec<Attribution>,
    pub tags: Vec<String>,
    pub issues: Vec<String>,
    pub help_types: Vec<String>,
    /// Display name of the publishing account's profile, falling back
    /// to the account name. Never the email address.
    pub publisher_name: Option<String>,
    pub submitter_profile_id: Option<i32>,
    pub bookmark_count: u64,
    pub is_bookmarked: bool,
}

pub async fn load_bundle<C: ConnectionTrait>(
    conn: &C,
    entry: entry::Model,
    viewer_profile_id: Option<i32>,
) -> Result<EntryBundle, ServiceError> {
    let mut bundles = load_bundles(conn, vec![entry], viewer_profile_id).await?;
    bundles
        .pop()
        .ok_or_else(|| ServiceError::NotFound("entry".to_string()))
}

/// Assemble bundles for a page of entries with a fixed number of
/// queries, independent of page size. Input order is preserved.
pub async fn load_bundles<C: ConnectionTrait>(
    conn: &C,
    entries: Vec<entry::Model>,
    viewer_profile_id: Option<i32>,
) -> Result<Vec<EntryBundle>, ServiceError> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let entry_ids: Vec<i32> = entries.iter().map(|e| e.id).collect();

    let creator_rows = entry_creator::Entity::find()
        .filter(entry_creator::Column::EntryId.is_in(entry_ids.clone()))
        .order_by_asc(entry_creator::Column::Id)
        .all(conn)
        .await?;

    let publisher_account_ids: Vec<i32> = entries.iter().map(|e| e.published_by).collect();

    let mut profile_ids: Vec<i32> = creator_rows.iter().map(|r| r.profile_id).collect();
    if let Some(viewer) = viewer_profile_id {
        profile_ids.push(viewer);
    }

    // Publisher profiles are looked up by account, the rest by id.
    let profiles = {
        let mut condition = sea_orm::Condition::any();
        if !profile_ids.is_empty() {
            condition = condition.add(profile::Column::Id.is_in(profile_ids));
        }
        condition = condition.add(profile::Column::AccountId.is_in(publisher_account_ids.clone()));
        profile::Entity::find().filter(condition).all(conn).await?
    };

    let mut account_ids: Vec<i32> = profiles.iter().filter_map(|p| p.account_id).collect();
    account_ids.extend(publisher_account_ids);
    let accounts = account::Entity::find()
        .filter(account::Column::Id.is_in(account_ids))
        .all(conn)
        .await?;

    let tag_links = entry_tag::Entity::find()
        .filter(entry_tag::Column::EntryId.is_in(entry_ids.clone()))
        .all(conn)
        .await?;
    let tags = tag::Entity::find()
        .filter(tag::Column::Id.is_in(tag_links.iter().map(|l| l.tag_id).collect::<Vec<_>>()))
        .all(conn)
        .await?;

    let issue_links = entry_issue::Entity::find()
        .filter(entry_issue::Column::EntryId.is_in(entry_ids.clone()))
        .all(conn)
        .await?;
    let issues = issue::Entity::find()
        .filter(issue::Column::Id.is_in(issue_links.iter().map(|l| l.issue_id).collect::<Vec<_>>()))
        .all(conn)
        .await?;

    let help_links = entry_help_type::Entity::find()
        .filter(entry_help_type::Column::EntryId.is_in(entry_ids.clone()))
        .all(conn)
        .await?;
    let help_types = help_type::Entity::find()
        .filter(
            help_type::Column::Id
                .is_in(help_links.iter().map(|l| l.help_type_id).collect::<Vec<_>>()),
        )
        .all(conn)
        .await?;

    let bookmarks = bookmark::Entity::find()
        .filter(bookmark::Column::EntryId.is_in(entry_ids))
        .all(conn)
        .await?;

    let profile_by_id: HashMap<i32, &profile::Model> =
        profiles.iter().map(|p| (p.id, p)).collect();
    let profile_by_account: HashMap<i32, &profile::Model> = profiles
        .iter()
        .filter_map(|p| p.account_id.map(|aid| (aid, p)))
        .collect();
    let account_by_id: HashMap<i32, &account::Model> =
        accounts.iter().map(|a| (a.id, a)).collect();

    let mut bundles = Vec::with_capacity(entries.len());
    for entry in entries {
        let attributions: Vec<Attribution> = creator_rows
            .iter()
            .filter(|r| r.entry_id == entry.id)
            .filter_map(|record| {
                let profile = profile_by_id.get(&record.profile_id)?;
                let account_name = profile
                    .account_id
                    .and_then(|aid| account_by_id.get(&aid))
                    .map(|a| a.name.clone());
                Some(Attribution {
                    record: record.clone(),
                    profile: (*profile).clone(),
                    account_name,
                })
            })
            .collect();

        let publisher_profile = profile_by_account.get(&entry.published_by);
        let publisher_name = publisher_profile
            .and_then(|p| p.custom_name.clone())
            .or_else(|| {
                account_by_id
                    .get(&entry.published_by)
                    .map(|a| a.name.clone())
            });
        let submitter_profile_id = publisher_profile.map(|p| p.id);

        let entry_tags: Vec<String> = tag_links
            .iter()
            .filter(|l| l.entry_id == entry.id)
            .filter_map(|l| tags.iter().find(|t| t.id == l.tag_id))
            .map(|t| t.name.clone())
            .collect();

        let entry_issues: Vec<String> = issue_links
            .iter()
            .filter(|l| l.entry_id == entry.id)
            .filter_map(|l| issues.iter().find(|i| i.id == l.issue_id))
            .map(|i| i.name.clone())
            .collect();

        let entry_help_types: Vec<String> = help_links
            .iter()
            .filter(|l| l.entry_id == entry.id)
            .filter_map(|l| help_types.iter().find(|h| h.id == l.help_type_id))
            .map(|h| h.name.clone())
            .collect();

        let bookmark_count = bookmarks.iter().filter(|b| b.entry_id == entry.id).count() as u64;
        let is_bookmarked = viewer_profile_id
            .map(|viewer| {
                bookmarks
                    .iter()
                    .any(|b| b.entry_id == entry.id && b.profile_id == viewer)
            })
            .unwrap_or(false);

        bundles.push(EntryBundle {
            entry,
            attributions,
            tags: entry_tags,
            issues: entry_issues,
            help_types: entry_help_types,
            publisher_name,
            submitter_profile_id,
            bookmark_count,
            is_bookmarked,
        });
    }

    Ok(bundles)
}
