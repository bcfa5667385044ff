//! Taxonomy listing handlers. All three serve flat name lists with an
//! optional prefix search.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::modules::taxonomy;

#[derive(Debug, Deserialize)]
pub struct TaxonomyQuery {
    pub search: Option<String>,
}

pub async fn tags(
    State(state): State<AppState>,
    Query(query): Query<TaxonomyQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let tags = taxonomy::list_tags(&state.db, query.search.as_deref()).await?;
    Ok(Json(tags.into_iter().map(|t| t.name).collect()))
}

pub async fn issues(
    State(state): State<AppState>,
    Query(query): Query<TaxonomyQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let issues = taxonomy::list_issues(&state.db, query.search.as_deref()).await?;
    Ok(Json(issues.into_iter().map(|i| i.name).collect()))
}

pub async fn help_types(
    State(state): State<AppState>,
    Query(query): Query<TaxonomyQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let help_types = taxonomy::list_help_types(&state.db, query.search.as_deref()).await?;
    Ok(Json(help_types.into_iter().map(|h| h.name).collect()))
}
