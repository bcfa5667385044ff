//! Profile store and identity services.
//!
//! Profile creation for a new account is an explicit service call made
//! in the same transaction as the account write; there is no implicit
//! signal machinery. Orphan placeholder profiles (created by
//! attribution-by-name) are swept by `delete_orphans`.

use chrono::Utc;
use entity::{account, bookmark, entry_creator, profile};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::info;

use crate::modules::error::ServiceError;

pub const DEFAULT_PAGE_SIZE: u64 = 30;
pub const MAX_PAGE_SIZE: u64 = 50;

/// A profile plus its linked account, when any.
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub profile: profile::Model,
    pub account: Option<account::Model>,
}

impl ProfileRecord {
    /// Explicit custom name, else linked-account name, else none.
    pub fn display_name(&self) -> Option<String> {
        self.profile
            .custom_name
            .clone()
            .or_else(|| self.account.as_ref().map(|a| a.name.clone()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileFilters {
    pub ids: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

impl ProfileFilters {
    /// Listing without any recognized filter returns nothing, rather
    /// than every profile in existence.
    fn has_recognized_filter(&self) -> bool {
        self.ids.is_some() || self.name.is_some() || self.is_active.is_some() || self.search.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryCounts {
    pub created: u64,
    pub published: u64,
    pub favorited: u64,
}

/// Create an account together with its profile, atomically. Replaces
/// the legacy auto-create-on-save signal with a direct call.
pub async fn create_account(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    is_staff: bool,
    is_moderator: bool,
) -> Result<(account::Model, profile::Model), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::invalid("name", "a name is required"));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ServiceError::invalid("email", "a valid email is required"));
    }

    let txn = db.begin().await.map_err(ServiceError::from)?;

    let account = account::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        is_staff: Set(is_staff),
        is_moderator: Set(is_moderator),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let profile = profile::ActiveModel {
        account_id: Set(Some(account.id)),
        is_active: Set(true),
        enable_extended_info: Set(false),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await.map_err(ServiceError::from)?;
    info!(account_id = account.id, "account registered");

    Ok((account, profile))
}

/// The profile for an account, if one exists. Read paths use this so a
/// GET never writes.
pub async fn find_for_account<C: ConnectionTrait>(
    conn: &C,
    account_id: i32,
) -> Result<Option<profile::Model>, ServiceError> {
    Ok(profile::Entity::find()
        .filter(profile::Column::AccountId.eq(account_id))
        .one(conn)
        .await?)
}

/// The profile for an account, creating one if it is missing.
pub async fn ensure_profile<C: ConnectionTrait>(
    conn: &C,
    account_id: i32,
) -> Result<profile::Model, ServiceError> {
    if let Some(existing) = profile::Entity::find()
        .filter(profile::Column::AccountId.eq(account_id))
        .one(conn)
        .await?
    {
        return Ok(existing);
    }

    Ok(profile::ActiveModel {
        account_id: Set(Some(account_id)),
        is_active: Set(true),
        enable_extended_info: Set(false),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

pub async fn get_record<C: ConnectionTrait>(
    conn: &C,
    profile_id: i32,
) -> Result<ProfileRecord, ServiceError> {
    let profile = profile::Entity::find_by_id(profile_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("profile {profile_id}")))?;

    attach_account(conn, profile).await
}

async fn attach_account<C: ConnectionTrait>(
    conn: &C,
    profile: profile::Model,
) -> Result<ProfileRecord, ServiceError> {
    let account = match profile.account_id {
        Some(account_id) => account::Entity::find_by_id(account_id).one(conn).await?,
        None => None,
    };
    Ok(ProfileRecord { profile, account })
}

async fn attach_accounts<C: ConnectionTrait>(
    conn: &C,
    profiles: Vec<profile::Model>,
) -> Result<Vec<ProfileRecord>, ServiceError> {
    let account_ids: Vec<i32> = profiles.iter().filter_map(|p| p.account_id).collect();
    let accounts = if account_ids.is_empty() {
        Vec::new()
    } else {
        account::Entity::find()
            .filter(account::Column::Id.is_in(account_ids))
            .all(conn)
            .await?
    };

    Ok(profiles
        .into_iter()
        .map(|profile| {
            let account = profile
                .account_id
                .and_then(|aid| accounts.iter().find(|a| a.id == aid).cloned());
            ProfileRecord { profile, account }
        })
        .collect())
}

/// Filtered profile listing. Name matching ranks prefix matches before
/// substring matches, the way the legacy autocomplete behaves.
pub async fn list(
    db: &DatabaseConnection,
    filters: &ProfileFilters,
) -> Result<(Vec<ProfileRecord>, u64), ServiceError> {
    if !filters.has_recognized_filter() {
        return Ok((Vec::new(), 0));
    }

    let page = filters.page.max(1);
    let page_size = if filters.page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        filters.page_size.min(MAX_PAGE_SIZE)
    };

    if let Some(name) = filters.name.as_deref() {
        let ranked = ranked_name_matches(db, name, filters.is_active).await?;
        let total = ranked.len() as u64;
        let start = ((page - 1) * page_size) as usize;
        let page_items: Vec<profile::Model> = ranked
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        let records = attach_accounts(db, page_items).await?;
        return Ok((records, total));
    }

    let mut select = profile::Entity::find().order_by_desc(profile::Column::Id);

    match filters.is_active {
        Some(active) => select = select.filter(profile::Column::IsActive.eq(active)),
        // Inactive profiles are hidden unless explicitly requested.
        None => select = select.filter(profile::Column::IsActive.eq(true)),
    }

    if let Some(ids) = filters.ids.as_deref() {
        let parsed: Vec<i32> = ids.split(',').filter_map(|x| x.trim().parse().ok()).collect();
        if parsed.is_empty() {
            return Ok((Vec::new(), 0));
        }
        select = select.filter(profile::Column::Id.is_in(parsed));
    }

    if let Some(term) = filters.search.as_deref() {
        let account_ids: Vec<i32> = account::Entity::find()
            .filter(account::Column::Name.contains(term))
            .all(db)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();

        let mut condition = sea_orm::Condition::any()
            .add(profile::Column::CustomName.contains(term))
            .add(profile::Column::UserBio.contains(term))
            .add(profile::Column::UserBioLong.contains(term))
            .add(profile::Column::Affiliation.contains(term))
            .add(profile::Column::Location.contains(term));
        if !account_ids.is_empty() {
            condition = condition.add(profile::Column::AccountId.is_in(account_ids));
        }
        select = select.filter(condition);
    }

    let total = select.clone().count(db).await.map_err(ServiceError::from)?;
    let profiles = select
        .offset((page - 1) * page_size)
        .limit(page_size)
        .all(db)
        .await?;

    let records = attach_accounts(db, profiles).await?;
    Ok((records, total))
}

/// Active-profile autocomplete for the legacy creators endpoint.
pub async fn autocomplete(
    db: &DatabaseConnection,
    name: Option<&str>,
    page: u64,
    page_size: u64,
) -> Result<(Vec<ProfileRecord>, u64), ServiceError> {
    let page = page.max(1);

    let matches = match name {
        Some(prefix) if !prefix.is_empty() => ranked_name_matches(db, prefix, Some(true)).await?,
        _ => {
            profile::Entity::find()
                .filter(profile::Column::IsActive.eq(true))
                .order_by_asc(profile::Column::Id)
                .all(db)
                .await?
        }
    };

    let total = matches.len() as u64;
    let start = ((page - 1) * page_size) as usize;
    let page_items: Vec<profile::Model> = matches
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    let records = attach_accounts(db, page_items).await?;
    Ok((records, total))
}

/// Profiles whose display name starts with the term, followed by those
/// that merely contain it.
async fn ranked_name_matches(
    db: &DatabaseConnection,
    term: &str,
    is_active: Option<bool>,
) -> Result<Vec<profile::Model>, ServiceError> {
    let prefix_account_ids: Vec<i32> = account::Entity::find()
        .filter(account::Column::Name.starts_with(term))
        .all(db)
        .await?
        .into_iter()
        .map(|a| a.id)
        .collect();

    let contains_account_ids: Vec<i32> = account::Entity::find()
        .filter(account::Column::Name.contains(term))
        .all(db)
        .await?
        .into_iter()
        .map(|a| a.id)
        .collect();

    let base = |condition: sea_orm::Condition| {
        let mut select = profile::Entity::find()
            .filter(condition)
            .order_by_asc(profile::Column::Id);
        if let Some(active) = is_active {
            select = select.filter(profile::Column::IsActive.eq(active));
        }
        select
    };

    let mut prefix_condition =
        sea_orm::Condition::any().add(profile::Column::CustomName.starts_with(term));
    if !prefix_account_ids.is_empty() {
        prefix_condition = prefix_condition.add(profile::Column::AccountId.is_in(prefix_account_ids));
    }

    let mut contains_condition =
        sea_orm::Condition::any().add(profile::Column::CustomName.contains(term));
    if !contains_account_ids.is_empty() {
        contains_condition =
            contains_condition.add(profile::Column::AccountId.is_in(contains_account_ids));
    }

    let starts = base(prefix_condition).all(db).await?;
    let contains = base(contains_condition).all(db).await?;

    let mut seen: std::collections::HashSet<i32> = starts.iter().map(|p| p.id).collect();
    let mut ranked = starts;
    for profile in contains {
        if seen.insert(profile.id) {
            ranked.push(profile);
        }
    }

    Ok(ranked)
}

/// Entry counts for a profile detail view: attributed creations that
/// are publicly visible, entries published by the linked account, and
/// bookmarks made by the profile.
pub async fn entry_counts<C: ConnectionTrait>(
    conn: &C,
    record: &ProfileRecord,
    public_entry_ids: Option<&[i32]>,
) -> Result<EntryCounts, ServiceError> {
    let attributed: Vec<i32> = entry_creator::Entity::find()
        .filter(entry_creator::Column::ProfileId.eq(record.profile.id))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.entry_id)
        .collect();

    let created = match public_entry_ids {
        Some(public) => attributed.iter().filter(|id| public.contains(id)).count() as u64,
        None => attributed.len() as u64,
    };

    let published = match &record.account {
        Some(account) => {
            let mut select = entity::entry::Entity::find()
                .filter(entity::entry::Column::PublishedBy.eq(account.id));
            if let Some(public) = public_entry_ids {
                select = select.filter(entity::entry::Column::Id.is_in(public.to_vec()));
            }
            select.count(conn).await.map_err(ServiceError::from)?
        }
        None => 0,
    };

    let favorited = bookmark::Entity::find()
        .filter(bookmark::Column::ProfileId.eq(record.profile.id))
        .count(conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(EntryCounts {
        created,
        published,
        favorited,
    })
}

/// Self-service profile edit. Only the fields present in the request
/// change; identity and activation stay where they are.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct UpdateProfileRequest {
    pub custom_name: Option<String>,
    pub user_bio: Option<String>,
    pub user_bio_long: Option<String>,
    pub affiliation: Option<String>,
    pub location: Option<String>,
    pub enable_extended_info: Option<bool>,
    pub thumbnail: Option<String>,
}

pub async fn update_profile<C: ConnectionTrait>(
    conn: &C,
    profile: profile::Model,
    request: UpdateProfileRequest,
) -> Result<profile::Model, ServiceError> {
    let mut active: profile::ActiveModel = profile.into();

    if let Some(name) = request.custom_name {
        let trimmed = name.trim().to_string();
        active.custom_name = Set(if trimmed.is_empty() { None } else { Some(trimmed) });
    }
    if let Some(bio) = request.user_bio {
        active.user_bio = Set(Some(bio));
    }
    if let Some(bio) = request.user_bio_long {
        active.user_bio_long = Set(Some(bio));
    }
    if let Some(affiliation) = request.affiliation {
        active.affiliation = Set(Some(affiliation));
    }
    if let Some(location) = request.location {
        active.location = Set(Some(location));
    }
    if let Some(enabled) = request.enable_extended_info {
        active.enable_extended_info = Set(enabled);
    }
    if let Some(thumbnail) = request.thumbnail {
        active.thumbnail = Set(Some(thumbnail));
    }

    Ok(active.update(conn).await?)
}

/// Delete placeholder profiles with no account, no attributions, and no
/// bookmarks. Returns the number of rows removed.
pub async fn delete_orphans(db: &DatabaseConnection) -> Result<u64, ServiceError> {
    let orphans: Vec<i32> = profile::Entity::find()
        .filter(profile::Column::AccountId.is_null())
        .all(db)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    if orphans.is_empty() {
        return Ok(0);
    }

    let attributed: std::collections::HashSet<i32> = entry_creator::Entity::find()
        .filter(entry_creator::Column::ProfileId.is_in(orphans.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.profile_id)
        .collect();

    let bookmarking: std::collections::HashSet<i32> = bookmark::Entity::find()
        .filter(bookmark::Column::ProfileId.is_in(orphans.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|b| b.profile_id)
        .collect();

    let removable: Vec<i32> = orphans
        .into_iter()
        .filter(|id| !attributed.contains(id) && !bookmarking.contains(id))
        .collect();

    if removable.is_empty() {
        return Ok(0);
    }

    let result = profile::Entity::delete_many()
        .filter(profile::Column::Id.is_in(removable))
        .exec(db)
        .await?;

    info!(removed = result.rows_affected, "orphan profiles swept");
    Ok(result.rows_affected)
}
