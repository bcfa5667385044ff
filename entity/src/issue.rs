//! Entity for curated issue areas.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "issue")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entry_issue::Entity")]
    EntryIssue,
}

impl Related<super::entry_issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryIssue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
