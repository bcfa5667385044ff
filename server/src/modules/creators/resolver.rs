//! Resolution of submission-time creator references.
//!
//! A candidate is either a pointer to an existing profile or a free-text
//! name. Resolution is a pure transform: it reads profiles but writes
//! nothing, producing deferred descriptors the ledger persists inside
//! the entry transaction. That separation is what makes entry +
//! attribution creation all-or-nothing.

use entity::profile;
use sea_orm::{ConnectionTrait, EntityTrait};
use serde::Deserialize;

use crate::modules::error::ServiceError;

/// One attribution candidate from a submission. `creator_id` is the v1
/// alias for `profile_id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatorCandidate {
    pub profile_id: Option<i32>,
    pub creator_id: Option<i32>,
    pub name: Option<String>,
}

impl CreatorCandidate {
    fn effective_id(&self) -> Option<i32> {
        self.profile_id.or(self.creator_id)
    }

    fn effective_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

/// A resolved creator, not yet persisted.
#[derive(Debug, Clone)]
pub enum ResolvedCreator {
    /// An existing, committed profile.
    Existing(profile::Model),
    /// A placeholder profile to be created alongside the entry.
    New { name: String },
}

/// Shape check, run eagerly before any write begins.
pub fn validate_candidates(candidates: &[CreatorCandidate]) -> Result<(), ServiceError> {
    for candidate in candidates {
        if candidate.effective_id().is_none() && candidate.effective_name().is_none() {
            return Err(ServiceError::invalid(
                "related_creators",
                "a profile id or a name must be provided",
            ));
        }
    }
    Ok(())
}

/// Resolve candidates in order. An unresolvable profile id fails the
/// whole batch; nothing is written.
pub async fn resolve_candidates<C: ConnectionTrait>(
    conn: &C,
    candidates: &[CreatorCandidate],
) -> Result<Vec<ResolvedCreator>, ServiceError> {
    validate_candidates(candidates)?;

    let mut resolved = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if let Some(id) = candidate.effective_id() {
            let existing = profile::Entity::find_by_id(id)
                .one(conn)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("profile {id}")))?;
            resolved.push(ResolvedCreator::Existing(existing));
        } else if let Some(name) = candidate.effective_name() {
            resolved.push(ResolvedCreator::New {
                name: name.to_string(),
            });
        }
    }

    Ok(resolved)
}
