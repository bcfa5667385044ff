//! Entry listing: filters, search, ordering, pagination.

use entity::{entry, entry_help_type, entry_issue, entry_tag, help_type, issue, tag};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};
use serde::Deserialize;

use crate::modules::error::ServiceError;
use crate::modules::moderation;

pub const DEFAULT_PAGE_SIZE: u64 = 48;
pub const MAX_PAGE_SIZE: u64 = 1000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryFilters {
    /// Space-separated terms, all of which must match.
    pub search: Option<String>,
    pub tag: Option<String>,
    pub issue: Option<String>,
    pub help_type: Option<String>,
    pub featured: Option<bool>,
    /// Comma-separated entry ids; non-numeric values are dropped.
    pub ids: Option<String>,
    /// Moderation state name. Only honored for moderators; an unknown
    /// name yields an empty page.
    pub moderationstate: Option<String>,
    pub ordering: Option<String>,
    #[serde(default)]
    pub page: u64,
    pub page_size: Option<u64>,
}

/// Ordering allowlist. Anything else falls back to newest first.
pub(crate) fn apply_ordering(
    select: Select<entry::Entity>,
    ordering: Option<&str>,
) -> Select<entry::Entity> {
    match ordering {
        Some("created_at") => select.order_by_asc(entry::Column::CreatedAt),
        Some("-created_at") => select.order_by_desc(entry::Column::CreatedAt),
        Some("title") => select.order_by_asc(entry::Column::Title),
        Some("-title") => select.order_by_desc(entry::Column::Title),
        Some("id") => select.order_by_asc(entry::Column::Id),
        _ => select.order_by_desc(entry::Column::Id),
    }
}

/// List entries with filters and pagination, returning the page plus
/// the total match count.
///
/// Visibility: the public set is approved entries. Moderators may
/// instead select any single state by name via `moderationstate`; the
/// caller decides whether that filter is honored.
pub async fn list(
    db: &DatabaseConnection,
    filters: &EntryFilters,
    allow_state_filter: bool,
) -> Result<(Vec<entry::Model>, u64), ServiceError> {
    let mut select = entry::Entity::find();

    match filters.moderationstate.as_deref().filter(|_| allow_state_filter) {
        Some(name) => match moderation::find_by_name(db, name).await? {
            Some(state) => {
                select = select.filter(entry::Column::ModerationStateId.eq(state.id));
            }
            None => return Ok((Vec::new(), 0)),
        },
        None => {
            if let Some(approved) = moderation::approved_state(db).await? {
                select = select.filter(entry::Column::ModerationStateId.eq(approved.id));
            }
        }
    }

    if let Some(featured) = filters.featured {
        select = select.filter(entry::Column::Featured.eq(featured));
    }

    if let Some(ids) = filters.ids.as_deref() {
        let parsed: Vec<i32> = ids.split(',').filter_map(|x| x.trim().parse().ok()).collect();
        if parsed.is_empty() {
            return Ok((Vec::new(), 0));
        }
        select = select.filter(entry::Column::Id.is_in(parsed));
    }

    if let Some(tag_name) = filters.tag.as_deref() {
        match tagged_entry_ids(db, tag_name).await? {
            Some(entry_ids) => select = select.filter(entry::Column::Id.is_in(entry_ids)),
            None => return Ok((Vec::new(), 0)),
        }
    }

    if let Some(issue_name) = filters.issue.as_deref() {
        match issue_entry_ids(db, issue_name).await? {
            Some(entry_ids) => select = select.filter(entry::Column::Id.is_in(entry_ids)),
            None => return Ok((Vec::new(), 0)),
        }
    }

    if let Some(help_name) = filters.help_type.as_deref() {
        match help_type_entry_ids(db, help_name).await? {
            Some(entry_ids) => select = select.filter(entry::Column::Id.is_in(entry_ids)),
            None => return Ok((Vec::new(), 0)),
        }
    }

    if let Some(search) = filters.search.as_deref() {
        for term in search.split_whitespace() {
            select = select.filter(search_term_condition(db, term).await?);
        }
    }

    let page = filters.page.max(1);
    let page_size = filters
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let total = select.clone().count(db).await.map_err(ServiceError::from)?;
    let entries = apply_ordering(select, filters.ordering.as_deref())
        .offset((page - 1) * page_size)
        .limit(page_size)
        .all(db)
        .await?;

    Ok((entries, total))
}

/// Every term matches the text fields or a tag name carrying it.
async fn search_term_condition(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Condition, ServiceError> {
    let mut condition = Condition::any()
        .add(entry::Column::Title.contains(term))
        .add(entry::Column::Description.contains(term))
        .add(entry::Column::GetInvolved.contains(term))
        .add(entry::Column::Interest.contains(term));

    let tag_ids: Vec<i32> = tag::Entity::find()
        .filter(tag::Column::Name.contains(term))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();

    if !tag_ids.is_empty() {
        let entry_ids: Vec<i32> = entry_tag::Entity::find()
            .filter(entry_tag::Column::TagId.is_in(tag_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.entry_id)
            .collect();
        if !entry_ids.is_empty() {
            condition = condition.add(entry::Column::Id.is_in(entry_ids));
        }
    }

    Ok(condition)
}

/// Entry ids carrying an exact tag name; `None` when the tag itself is
/// unknown (no entry can match).
async fn tagged_entry_ids(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<Vec<i32>>, ServiceError> {
    let Some(tag) = tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    Ok(Some(
        entry_tag::Entity::find()
            .filter(entry_tag::Column::TagId.eq(tag.id))
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.entry_id)
            .collect(),
    ))
}

async fn issue_entry_ids(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<Vec<i32>>, ServiceError> {
    let Some(issue) = issue::Entity::find()
        .filter(issue::Column::Name.eq(name))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    Ok(Some(
        entry_issue::Entity::find()
            .filter(entry_issue::Column::IssueId.eq(issue.id))
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.entry_id)
            .collect(),
    ))
}

async fn help_type_entry_ids(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<Vec<i32>>, ServiceError> {
    let Some(help_type) = help_type::Entity::find()
        .filter(help_type::Column::Name.eq(name))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    Ok(Some(
        entry_help_type::Entity::find()
            .filter(entry_help_type::Column::HelpTypeId.eq(help_type.id))
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.entry_id)
            .collect(),
    ))
}

/// Ids of all publicly visible entries.
pub async fn visible_entry_ids(db: &DatabaseConnection) -> Result<Vec<i32>, ServiceError> {
    let mut select = entry::Entity::find();
    if let Some(approved) = moderation::approved_state(db).await? {
        select = select.filter(entry::Column::ModerationStateId.eq(approved.id));
    }
    Ok(select
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect())
}
