//! Entity for submitted directory entries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Required, at most 140 characters.
    pub title: String,

    /// Required link to the actual content.
    pub content_url: String,

    pub description: Option<String>,
    pub get_involved: Option<String>,
    pub get_involved_url: Option<String>,
    pub interest: Option<String>,

    pub featured: bool,

    /// Staff-only notes, written through the admin collaborator.
    /// Never serialized by any API version.
    pub internal_notes: Option<String>,

    /// Relative path into the media store.
    pub thumbnail: Option<String>,

    /// Submitting account. Rendered as a display name, never an email.
    pub published_by: i32,

    /// When set, the submitter's own profile is attributed as a creator.
    pub published_by_creator: bool,

    /// Never null after creation; gates public visibility.
    pub moderation_state_id: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::PublishedBy",
        to = "super::account::Column::Id"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::moderation_state::Entity",
        from = "Column::ModerationStateId",
        to = "super::moderation_state::Column::Id"
    )]
    ModerationState,
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

impl Related<super::moderation_state::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModerationState.def()
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
