//! Entity for curated "get involved" help types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "help_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entry_help_type::Entity")]
    EntryHelpType,
}

impl Related<super::entry_help_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryHelpType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
