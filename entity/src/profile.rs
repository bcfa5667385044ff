//! Entity for public-facing profiles.
//!
//! A profile may exist without a linked account: attribution by name
//! creates orphan placeholder profiles. An account has at most one
//! profile (unique constraint on account_id).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Linked account, if this is a registered identity.
    #[sea_orm(unique, nullable)]
    pub account_id: Option<i32>,

    /// Explicit display name. Falls back to the account name when unset.
    pub custom_name: Option<String>,

    /// Inactive profiles are hidden from public listings, not deleted.
    pub is_active: bool,

    /// Gates the extended-info fields (long bio, affiliation) in output.
    pub enable_extended_info: bool,

    pub user_bio: Option<String>,
    pub user_bio_long: Option<String>,
    pub affiliation: Option<String>,
    pub location: Option<String>,
    pub thumbnail: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    #[sea_orm(has_many = "super::entry_creator::Entity")]
    EntryCreator,
    #[sea_orm(has_many = "super::bookmark::Entity")]
    Bookmark,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::entry_creator::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryCreator.def()
    }
}

impl Related<super::bookmark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookmark.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
