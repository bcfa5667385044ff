//! Legacy creators autocomplete.
//!
//! Backed by active profiles; item shape carries both `creator_id` and
//! `profile_id` so old clients keep working.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::api::dto::{ApiError, PageResponse};
use crate::api::servers::app_state::AppState;
use crate::modules::profiles;
use crate::modules::projection::CreatorListItem;

const DEFAULT_PAGE_SIZE: u64 = 6;
const MAX_PAGE_SIZE: u64 = 20;

#[derive(Debug, Deserialize)]
pub struct CreatorListQuery {
    pub name: Option<String>,
    #[serde(default)]
    pub page: u64,
    pub page_size: Option<u64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CreatorListQuery>,
) -> Result<Json<PageResponse<CreatorListItem>>, ApiError> {
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let (records, count) =
        profiles::autocomplete(&state.db, query.name.as_deref(), query.page, page_size).await?;

    Ok(Json(PageResponse {
        count,
        results: records.iter().map(CreatorListItem::from_record).collect(),
    }))
}
