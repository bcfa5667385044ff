//! The entry aggregate: submission, visibility, moderation.
//!
//! Submission is all-or-nothing. Validation and creator resolution run
//! before the transaction opens; the entry row, taxonomy links, and
//! attribution ledger commit together or not at all. Thumbnail bytes
//! are written to the blob store before the transaction, so a failed
//! commit can leave an orphan file but never a dangling database row.

pub mod bundle;
pub mod query;

pub use bundle::{load_bundle, load_bundles, EntryBundle};
pub use query::{list, visible_entry_ids, EntryFilters};

use chrono::Utc;
use entity::{entry, entry_help_type, entry_issue, entry_tag};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::info;

use crate::modules::auth::{self, CurrentUser};
use crate::modules::creators::{self, CreatorCandidate};
use crate::modules::error::ServiceError;
use crate::modules::media::{self, ThumbnailPayload, ThumbnailStore};
use crate::modules::moderation;
use crate::modules::profiles;
use crate::modules::taxonomy;

pub const TITLE_MAX_LEN: usize = 140;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEntryRequest {
    pub title: String,
    pub content_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub get_involved: Option<String>,
    #[serde(default)]
    pub get_involved_url: Option<String>,
    #[serde(default)]
    pub interest: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<ThumbnailPayload>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub help_types: Vec<String>,
    #[serde(default)]
    pub related_creators: Vec<CreatorCandidate>,
    #[serde(default)]
    pub published_by_creator: bool,
}

fn validate_request(request: &CreateEntryRequest) -> Result<(), ServiceError> {
    let mut errors = Vec::new();

    if request.title.trim().is_empty() {
        errors.push(("title", "a title is required"));
    } else if request.title.chars().count() > TITLE_MAX_LEN {
        errors.push(("title", "titles are limited to 140 characters"));
    }

    if request.content_url.trim().is_empty() {
        errors.push(("content_url", "a content url is required"));
    } else if !is_http_url(&request.content_url) {
        errors.push(("content_url", "content url must be an http(s) url"));
    }

    if let Some(url) = request.get_involved_url.as_deref() {
        if !url.is_empty() && !is_http_url(url) {
            errors.push(("get_involved_url", "get involved url must be an http(s) url"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(
            errors
                .into_iter()
                .map(|(field, message)| crate::modules::error::FieldError {
                    field: field.to_string(),
                    message: message.to_string(),
                })
                .collect(),
        ))
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Create an entry on behalf of the authenticated submitter.
pub async fn create(
    db: &DatabaseConnection,
    media_store: &dyn ThumbnailStore,
    trusted_domains: &[String],
    user: &CurrentUser,
    request: CreateEntryRequest,
) -> Result<entry::Model, ServiceError> {
    validate_request(&request)?;
    creators::validate_candidates(&request.related_creators)?;

    let thumbnail_path = match request.thumbnail.as_ref() {
        Some(payload) => {
            let (name, bytes) = media::decode_payload(payload)?;
            Some(media_store.store(&name, &bytes)?)
        }
        None => None,
    };

    let txn = db.begin().await.map_err(ServiceError::from)?;

    let account = auth::account_for(&txn, user).await?;
    let state = moderation::initial_state(&txn, &account.email, trusted_domains).await?;

    let entry = entry::ActiveModel {
        title: Set(request.title.trim().to_string()),
        content_url: Set(request.content_url.trim().to_string()),
        description: Set(request.description.clone()),
        get_involved: Set(request.get_involved.clone()),
        get_involved_url: Set(request.get_involved_url.clone()),
        interest: Set(request.interest.clone()),
        featured: Set(false),
        internal_notes: Set(None),
        thumbnail: Set(thumbnail_path),
        published_by: Set(account.id),
        published_by_creator: Set(request.published_by_creator),
        moderation_state_id: Set(state.id),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for name in taxonomy::normalize_tag_names(&request.tags) {
        let tag = taxonomy::get_or_create_tag(&txn, &name).await?;
        entry_tag::ActiveModel {
            entry_id: Set(entry.id),
            tag_id: Set(tag.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for name in &request.issues {
        let issue = taxonomy::resolve_issue(&txn, name).await?;
        entry_issue::ActiveModel {
            entry_id: Set(entry.id),
            issue_id: Set(issue.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for name in &request.help_types {
        let help_type = taxonomy::resolve_help_type(&txn, name).await?;
        entry_help_type::ActiveModel {
            entry_id: Set(entry.id),
            help_type_id: Set(help_type.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let submitter_profile = profiles::ensure_profile(&txn, account.id).await?;
    let resolved = creators::resolve_candidates(&txn, &request.related_creators).await?;
    creators::set_attributions(&txn, &entry, resolved, Some(&submitter_profile)).await?;

    txn.commit().await.map_err(ServiceError::from)?;
    info!(entry_id = entry.id, state = %state.name, "entry submitted");

    Ok(entry)
}

/// Fetch one entry with no visibility check. Bookmarking resolves over
/// the full table, so pending entries can be saved too.
pub async fn get_any(
    db: &DatabaseConnection,
    entry_id: i32,
) -> Result<entry::Model, ServiceError> {
    entry::Entity::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("entry {entry_id}")))
}

/// Subset of the given ids that match an entry row, any state.
pub async fn existing_entry_ids(
    db: &DatabaseConnection,
    candidate_ids: &[i32],
) -> Result<Vec<i32>, ServiceError> {
    if candidate_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(entry::Entity::find()
        .filter(entry::Column::Id.is_in(candidate_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect())
}

/// Fetch one entry, enforcing visibility: approved entries are public,
/// everything else is visible only to its publisher and to moderators.
pub async fn get_visible(
    db: &DatabaseConnection,
    entry_id: i32,
    user: Option<&CurrentUser>,
) -> Result<entry::Model, ServiceError> {
    let entry = entry::Entity::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("entry {entry_id}")))?;

    if let Some(approved) = moderation::approved_state(db).await? {
        if entry.moderation_state_id == approved.id {
            return Ok(entry);
        }
    } else {
        // No approved state configured: nothing is gated.
        return Ok(entry);
    }

    if let Some(user) = user {
        if entry.published_by == user.account_id || auth::is_moderator(db, user).await? {
            return Ok(entry);
        }
    }

    Err(ServiceError::NotFound(format!("entry {entry_id}")))
}

/// Move an entry to another moderation state. Caller must already have
/// passed the moderator gate.
pub async fn moderate(
    db: &DatabaseConnection,
    entry_id: i32,
    state_id: i32,
) -> Result<entry::Model, ServiceError> {
    let state = moderation::get_state(db, state_id).await?;
    let entry = entry::Entity::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("entry {entry_id}")))?;

    let mut active: entry::ActiveModel = entry.into();
    active.moderation_state_id = Set(state.id);
    let updated = active.update(db).await?;

    info!(entry_id, state = %state.name, "entry moderated");
    Ok(updated)
}

/// Flip the featured flag. Moderator-gated by the caller.
pub async fn toggle_featured(
    db: &DatabaseConnection,
    entry_id: i32,
) -> Result<entry::Model, ServiceError> {
    let entry = entry::Entity::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("entry {entry_id}")))?;

    let featured = !entry.featured;
    let mut active: entry::ActiveModel = entry.into();
    active.featured = Set(featured);
    Ok(active.update(db).await?)
}

/// Publicly visible entries attributed to a profile.
pub async fn created_by_profile(
    db: &DatabaseConnection,
    profile_id: i32,
    ordering: Option<&str>,
) -> Result<Vec<entry::Model>, ServiceError> {
    let entry_ids: Vec<i32> = entity::entry_creator::Entity::find()
        .filter(entity::entry_creator::Column::ProfileId.eq(profile_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.entry_id)
        .collect();

    if entry_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut select = entry::Entity::find().filter(entry::Column::Id.is_in(entry_ids));
    if let Some(approved) = moderation::approved_state(db).await? {
        select = select.filter(entry::Column::ModerationStateId.eq(approved.id));
    }
    Ok(query::apply_ordering(select, ordering).all(db).await?)
}

/// Publicly visible entries published by an account.
pub async fn published_by_account(
    db: &DatabaseConnection,
    account_id: i32,
    ordering: Option<&str>,
) -> Result<Vec<entry::Model>, ServiceError> {
    let mut select = entry::Entity::find().filter(entry::Column::PublishedBy.eq(account_id));
    if let Some(approved) = moderation::approved_state(db).await? {
        select = select.filter(entry::Column::ModerationStateId.eq(approved.id));
    }
    Ok(query::apply_ordering(select, ordering).all(db).await?)
}

/// Publicly visible entries bookmarked by a profile, most recently
/// bookmarked first.
pub async fn favorited_by_profile(
    db: &DatabaseConnection,
    profile_id: i32,
) -> Result<Vec<entry::Model>, ServiceError> {
    let ordered_ids = crate::modules::bookmarks::bookmarked_entry_ids(db, profile_id).await?;
    if ordered_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut select = entry::Entity::find().filter(entry::Column::Id.is_in(ordered_ids.clone()));
    if let Some(approved) = moderation::approved_state(db).await? {
        select = select.filter(entry::Column::ModerationStateId.eq(approved.id));
    }
    let entries = select.all(db).await?;

    // Preserve bookmark recency order.
    let mut ordered = Vec::with_capacity(entries.len());
    for id in ordered_ids {
        if let Some(entry) = entries.iter().find(|e| e.id == id) {
            ordered.push(entry.clone());
        }
    }
    Ok(ordered)
}
