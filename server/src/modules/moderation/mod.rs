//! Moderation states and the visibility state machine.
//!
//! States are a dynamic named set. Only `Approved` has behavioral
//! meaning: it gates public visibility. `Pending` and `Approved` are
//! guaranteed by the seed migration; the fallbacks here exist for
//! behavioral parity with the legacy system's migration windows.

use entity::moderation_state;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::modules::error::ServiceError;

pub const PENDING: &str = "Pending";
pub const APPROVED: &str = "Approved";

/// All states, id ascending (`Pending` first by creation order).
pub async fn list_states<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<moderation_state::Model>, ServiceError> {
    Ok(moderation_state::Entity::find()
        .order_by_asc(moderation_state::Column::Id)
        .all(conn)
        .await?)
}

pub async fn get_state<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<moderation_state::Model, ServiceError> {
    moderation_state::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("moderation state {id}")))
}

pub async fn find_by_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<Option<moderation_state::Model>, ServiceError> {
    Ok(moderation_state::Entity::find()
        .filter(moderation_state::Column::Name.eq(name))
        .one(conn)
        .await?)
}

/// The state gating public visibility, if it exists. A missing
/// `Approved` state means public queries degrade to "all entries".
pub async fn approved_state<C: ConnectionTrait>(
    conn: &C,
) -> Result<Option<moderation_state::Model>, ServiceError> {
    find_by_name(conn, APPROVED).await
}

/// Initial state for a new entry: `Approved` for trusted-domain
/// submitters, `Pending` otherwise. Falls back to the first-created
/// state if the named one is missing.
pub async fn initial_state<C: ConnectionTrait>(
    conn: &C,
    submitter_email: &str,
    trusted_domains: &[String],
) -> Result<moderation_state::Model, ServiceError> {
    let wanted = if is_trusted_domain(submitter_email, trusted_domains) {
        APPROVED
    } else {
        PENDING
    };

    if let Some(state) = find_by_name(conn, wanted).await? {
        return Ok(state);
    }

    moderation_state::Entity::find()
        .order_by_asc(moderation_state::Column::Id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound("moderation state".to_string()))
}

/// Exact-match check of the email's domain against the allowlist.
pub fn is_trusted_domain(email: &str, trusted_domains: &[String]) -> bool {
    match email.rsplit_once('@') {
        Some((_, domain)) if !domain.is_empty() => {
            trusted_domains.iter().any(|d| d == domain)
        }
        _ => false,
    }
}
