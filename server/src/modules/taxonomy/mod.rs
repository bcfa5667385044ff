//! Tags, issues, and help types.
//!
//! Tags are get-or-create on write, through a unique constraint and an
//! on-conflict upsert so concurrent submissions cannot create
//! duplicates. Issues and help types are curated: entry submissions may
//! only reference existing names.

use entity::{help_type, issue, tag};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};

use crate::modules::error::ServiceError;

/// Split comma-carrying values into separate names, trim whitespace,
/// drop empties, and de-duplicate preserving first occurrence. Legacy
/// clients submit values like `["a", "b,c"]`.
pub fn normalize_tag_names(raw: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut names = Vec::new();

    for value in raw {
        for part in value.split(',') {
            let name = part.trim();
            if !name.is_empty() && seen.insert(name.to_string()) {
                names.push(name.to_string());
            }
        }
    }

    names
}

pub async fn get_or_create_tag<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<tag::Model, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::invalid("tags", "tag names cannot be empty"));
    }

    tag::Entity::insert(tag::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(tag::Column::Name)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;

    tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("tag {name}")))
}

pub async fn resolve_issue<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<issue::Model, ServiceError> {
    issue::Entity::find()
        .filter(issue::Column::Name.eq(name))
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::invalid("issues", &format!("issue with name '{name}' does not exist"))
        })
}

pub async fn resolve_help_type<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<help_type::Model, ServiceError> {
    help_type::Entity::find()
        .filter(help_type::Column::Name.eq(name))
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::invalid(
                "help_types",
                &format!("help type with name '{name}' does not exist"),
            )
        })
}

/// Tags matching an optional name prefix, alphabetical.
pub async fn list_tags<C: ConnectionTrait>(
    conn: &C,
    search: Option<&str>,
) -> Result<Vec<tag::Model>, ServiceError> {
    let mut select = tag::Entity::find().order_by_asc(tag::Column::Name);
    if let Some(prefix) = search {
        select = select.filter(tag::Column::Name.starts_with(prefix));
    }
    Ok(select.all(conn).await?)
}

pub async fn list_issues<C: ConnectionTrait>(
    conn: &C,
    search: Option<&str>,
) -> Result<Vec<issue::Model>, ServiceError> {
    let mut select = issue::Entity::find().order_by_asc(issue::Column::Name);
    if let Some(prefix) = search {
        select = select.filter(issue::Column::Name.starts_with(prefix));
    }
    Ok(select.all(conn).await?)
}

pub async fn list_help_types<C: ConnectionTrait>(
    conn: &C,
    search: Option<&str>,
) -> Result<Vec<help_type::Model>, ServiceError> {
    let mut select = help_type::Entity::find().order_by_asc(help_type::Column::Name);
    if let Some(prefix) = search {
        select = select.filter(help_type::Column::Name.starts_with(prefix));
    }
    Ok(select.all(conn).await?)
}
