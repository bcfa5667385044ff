//! The ordered attribution ledger.
//!
//! Replace semantics: callers hand over the complete ordered list and
//! prior rows are dropped. Row id order is display order; reads never
//! re-sort. The caller is expected to run this inside the entry's
//! transaction so a failed replace leaves no partial state.

use std::collections::HashSet;

use chrono::Utc;
use entity::{account, entry, entry_creator, profile};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::debug;

use crate::modules::error::ServiceError;
use crate::modules::creators::resolver::ResolvedCreator;

/// One ledger row joined with its profile and, when the profile is
/// linked, the account carrying the fallback display name.
#[derive(Debug, Clone)]
pub struct Attribution {
    pub record: entry_creator::Model,
    pub profile: profile::Model,
    pub account_name: Option<String>,
}

impl Attribution {
    /// Custom name first, linked-account name second.
    pub fn display_name(&self) -> Option<String> {
        self.profile
            .custom_name
            .clone()
            .or_else(|| self.account_name.clone())
    }
}

/// Replace the entry's attribution rows with the resolved list, in
/// input order. Placeholder profiles are persisted here. When the entry
/// is flagged `published_by_creator`, the submitter's profile is
/// appended unless it already appears among the explicit attributions.
pub async fn set_attributions<C: ConnectionTrait>(
    conn: &C,
    entry: &entry::Model,
    resolved: Vec<ResolvedCreator>,
    submitter_profile: Option<&profile::Model>,
) -> Result<Vec<entry_creator::Model>, ServiceError> {
    entry_creator::Entity::delete_many()
        .filter(entry_creator::Column::EntryId.eq(entry.id))
        .exec(conn)
        .await?;

    let mut rows = Vec::with_capacity(resolved.len());
    let mut seen: HashSet<i32> = HashSet::new();

    for creator in resolved {
        let profile = match creator {
            ResolvedCreator::Existing(profile) => profile,
            ResolvedCreator::New { name } => {
                debug!(name = %name, "creating placeholder profile for attribution");
                profile::ActiveModel {
                    custom_name: Set(Some(name)),
                    is_active: Set(true),
                    enable_extended_info: Set(false),
                    created_at: Set(Utc::now().into()),
                    ..Default::default()
                }
                .insert(conn)
                .await?
            }
        };

        if seen.insert(profile.id) {
            let row = entry_creator::ActiveModel {
                entry_id: Set(entry.id),
                profile_id: Set(profile.id),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            rows.push(row);
        }
    }

    if entry.published_by_creator {
        let submitter = submitter_profile.ok_or_else(|| {
            ServiceError::NotFound(format!("profile for account {}", entry.published_by))
        })?;

        if seen.insert(submitter.id) {
            let row = entry_creator::ActiveModel {
                entry_id: Set(entry.id),
                profile_id: Set(submitter.id),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Ledger rows for an entry in creation order, with profiles and
/// account names attached.
pub async fn attributions_for<C: ConnectionTrait>(
    conn: &C,
    entry_id: i32,
) -> Result<Vec<Attribution>, ServiceError> {
    let records = entry_creator::Entity::find()
        .filter(entry_creator::Column::EntryId.eq(entry_id))
        .order_by_asc(entry_creator::Column::Id)
        .all(conn)
        .await?;

    if records.is_empty() {
        return Ok(Vec::new());
    }

    let profile_ids: Vec<i32> = records.iter().map(|r| r.profile_id).collect();
    let profiles = profile::Entity::find()
        .filter(profile::Column::Id.is_in(profile_ids))
        .all(conn)
        .await?;

    let account_ids: Vec<i32> = profiles.iter().filter_map(|p| p.account_id).collect();
    let accounts = if account_ids.is_empty() {
        Vec::new()
    } else {
        account::Entity::find()
            .filter(account::Column::Id.is_in(account_ids))
            .all(conn)
            .await?
    };

    let mut result = Vec::with_capacity(records.len());
    for record in records {
        let Some(profile) = profiles.iter().find(|p| p.id == record.profile_id) else {
            continue;
        };
        let account_name = profile.account_id.and_then(|aid| {
            accounts
                .iter()
                .find(|a| a.id == aid)
                .map(|a| a.name.clone())
        });
        result.push(Attribution {
            record,
            profile: profile.clone(),
            account_name,
        });
    }

    Ok(result)
}
