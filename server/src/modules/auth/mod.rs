//! Authentication and permission checks.
//!
//! Login flows live in an external collaborator; this module only
//! validates bearer tokens and resolves the calling account.

pub mod jwt;

use entity::account;
use sea_orm::{ConnectionTrait, EntityTrait};

use crate::modules::error::ServiceError;

/// The authenticated caller, as carried by a validated token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub account_id: i32,
    pub email: String,
    pub name: String,
}

impl CurrentUser {
    pub fn from_claims(claims: &jwt::Claims) -> Option<Self> {
        let account_id = claims.sub.parse::<i32>().ok()?;
        Some(Self {
            account_id,
            email: claims.email.clone(),
            name: claims.name.clone(),
        })
    }
}

/// Load the account row behind a token. A token for a deleted account
/// is treated as unauthenticated.
pub async fn account_for<C: ConnectionTrait>(
    conn: &C,
    user: &CurrentUser,
) -> Result<account::Model, ServiceError> {
    account::Entity::find_by_id(user.account_id)
        .one(conn)
        .await?
        .ok_or(ServiceError::Authentication)
}

/// Whether the caller may moderate entries (staff or moderator role).
pub async fn is_moderator<C: ConnectionTrait>(
    conn: &C,
    user: &CurrentUser,
) -> Result<bool, ServiceError> {
    let account = account_for(conn, user).await?;
    Ok(account.is_staff || account.is_moderator)
}

/// Moderation gate: `Permission` for authenticated non-moderators,
/// `Authentication` for anonymous callers.
pub async fn require_moderator<C: ConnectionTrait>(
    conn: &C,
    user: Option<&CurrentUser>,
) -> Result<(), ServiceError> {
    let user = user.ok_or(ServiceError::Authentication)?;
    if is_moderator(conn, user).await? {
        Ok(())
    } else {
        Err(ServiceError::Permission(
            "you do not have permission to change entries".to_string(),
        ))
    }
}
