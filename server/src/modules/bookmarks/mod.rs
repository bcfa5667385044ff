//! Per-profile bookmark ledger.
//!
//! Toggle is a strict flip: present rows are deleted, absent rows are
//! inserted. A unique (profile, entry) constraint closes the
//! concurrent-toggle race; the resulting violation surfaces as a
//! conflict rather than a duplicate row.

use chrono::Utc;
use entity::bookmark;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use tracing::debug;

use crate::modules::error::ServiceError;

/// Whether the toggle left the bookmark present or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Saved,
    Removed,
}

/// Flip the bookmark state for one (profile, entry) pair.
pub async fn toggle<C: ConnectionTrait>(
    conn: &C,
    profile_id: i32,
    entry_id: i32,
) -> Result<ToggleOutcome, ServiceError> {
    let existing = bookmark::Entity::find()
        .filter(bookmark::Column::ProfileId.eq(profile_id))
        .filter(bookmark::Column::EntryId.eq(entry_id))
        .all(conn)
        .await?;

    if !existing.is_empty() {
        // Multi-delete clears any legacy duplicates along with the row.
        bookmark::Entity::delete_many()
            .filter(bookmark::Column::ProfileId.eq(profile_id))
            .filter(bookmark::Column::EntryId.eq(entry_id))
            .exec(conn)
            .await?;
        debug!(profile_id, entry_id, "bookmark removed");
        return Ok(ToggleOutcome::Removed);
    }

    bookmark::ActiveModel {
        profile_id: Set(profile_id),
        entry_id: Set(entry_id),
        timestamp: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    debug!(profile_id, entry_id, "bookmark saved");
    Ok(ToggleOutcome::Saved)
}

/// Ensure bookmarks exist for every id in the batch. Ids that are
/// already bookmarked, or that match no entry row at all, are skipped
/// without failing the batch. Moderation state is not consulted.
pub async fn bulk_ensure<C: ConnectionTrait>(
    conn: &C,
    profile_id: i32,
    entry_ids: &[i32],
    known_entry_ids: &[i32],
) -> Result<u64, ServiceError> {
    let mut created = 0;

    for &entry_id in entry_ids {
        if !known_entry_ids.contains(&entry_id) {
            continue;
        }

        let present = bookmark::Entity::find()
            .filter(bookmark::Column::ProfileId.eq(profile_id))
            .filter(bookmark::Column::EntryId.eq(entry_id))
            .count(conn)
            .await
            .map_err(ServiceError::from)?;
        if present > 0 {
            continue;
        }

        bookmark::ActiveModel {
            profile_id: Set(profile_id),
            entry_id: Set(entry_id),
            timestamp: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        created += 1;
    }

    Ok(created)
}

/// Entry ids bookmarked by a profile, most recent first. Row id breaks
/// same-timestamp ties so the order stays stable.
pub async fn bookmarked_entry_ids<C: ConnectionTrait>(
    conn: &C,
    profile_id: i32,
) -> Result<Vec<i32>, ServiceError> {
    Ok(bookmark::Entity::find()
        .filter(bookmark::Column::ProfileId.eq(profile_id))
        .order_by_desc(bookmark::Column::Timestamp)
        .order_by_desc(bookmark::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|b| b.entry_id)
        .collect())
}

