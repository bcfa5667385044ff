//! Entity for registered platform accounts.
//!
//! Accounts are created by the external login collaborator; this core
//! only reads them for attribution, permissions, and display names.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Email acts as the login identifier. Never serialized to the API.
    #[sea_orm(unique)]
    pub email: String,

    /// Full display name.
    pub name: String,

    /// Staff flag; grants moderation rights.
    pub is_staff: bool,

    /// Explicit moderator role, independent of staff status.
    pub is_moderator: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entry::Entity")]
    Entry,
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
}

impl Related<super::entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entry.def()
    }
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
