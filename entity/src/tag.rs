//! Entity for free-form entry tags.
//!
//! Names are unique; writes go through an upsert so concurrent
//! get-or-create cannot race into duplicates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entry_tag::Entity")]
    EntryTag,
}

impl Related<super::entry_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
