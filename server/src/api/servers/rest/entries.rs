//! Entry API handlers.
//!
//! Thin controllers: extract, gate, delegate to the entry services,
//! project through the requested API version.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::dto::{ApiError, PageResponse};
use crate::api::servers::app_state::AppState;
use crate::api::servers::jwt_middleware::{AuthenticatedUser, MaybeUser};
use crate::modules::auth;
use crate::modules::bookmarks;
use crate::modules::entries::{self, CreateEntryRequest, EntryFilters};
use crate::modules::moderation;
use crate::modules::profiles;
use crate::modules::projection::{ApiVersion, EntryView};

pub async fn list(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    MaybeUser(user): MaybeUser,
    Query(filters): Query<EntryFilters>,
) -> Result<Json<PageResponse<EntryView>>, ApiError> {
    let allow_state_filter = match user.as_ref() {
        Some(user) => auth::is_moderator(&state.db, user).await?,
        None => false,
    };

    let viewer_profile_id = viewer_profile(&state, user.as_ref()).await?;

    let (page, count) = entries::list(&state.db, &filters, allow_state_filter).await?;
    let bundles = entries::load_bundles(&state.db, page, viewer_profile_id).await?;

    Ok(Json(PageResponse {
        count,
        results: bundles
            .iter()
            .map(|bundle| EntryView::render(bundle, version))
            .collect(),
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> Result<Json<EntryView>, ApiError> {
    let entry = entries::get_visible(&state.db, id, user.as_ref()).await?;
    let viewer_profile_id = viewer_profile(&state, user.as_ref()).await?;
    let bundle = entries::load_bundle(&state.db, entry, viewer_profile_id).await?;
    Ok(Json(EntryView::render(&bundle, version)))
}

pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CreateEntryRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let entry = entries::create(
        &state.db,
        state.media.as_ref(),
        &state.config.content.trusted_domains,
        &user,
        request,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "status": "submitted",
        "id": entry.id,
    })))
}

pub async fn moderate(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path((id, state_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    auth::require_moderator(&state.db, user.as_ref()).await?;
    entries::moderate(&state.db, id, state_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn feature(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    auth::require_moderator(&state.db, user.as_ref()).await?;
    let entry = entries::toggle_featured(&state.db, id).await?;
    info!(entry_id = id, featured = entry.featured, "featured flag toggled");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bookmark(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    // Resolves over all entries; pending ones can be bookmarked too.
    entries::get_any(&state.db, id).await?;

    let account = auth::account_for(&state.db, &user).await?;
    let profile = profiles::ensure_profile(&state.db, account.id).await?;
    bookmarks::toggle(&state.db, profile.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct BulkBookmarkQuery {
    /// Comma-separated entry ids; non-numeric values are dropped.
    pub ids: Option<String>,
}

pub async fn bulk_bookmark(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<BulkBookmarkQuery>,
) -> Result<StatusCode, ApiError> {
    let account = auth::account_for(&state.db, &user).await?;
    let profile = profiles::ensure_profile(&state.db, account.id).await?;

    let ids: Vec<i32> = query
        .ids
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(|x| x.trim().parse().ok())
        .collect();

    let known = entries::existing_entry_ids(&state.db, &ids).await?;
    bookmarks::bulk_ensure(&state.db, profile.id, &ids, &known).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_bookmarked(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<PageResponse<EntryView>>, ApiError> {
    let account = auth::account_for(&state.db, &user).await?;
    let profile = profiles::ensure_profile(&state.db, account.id).await?;

    let favorites = entries::favorited_by_profile(&state.db, profile.id).await?;
    let count = favorites.len() as u64;
    let bundles = entries::load_bundles(&state.db, favorites, Some(profile.id)).await?;

    Ok(Json(PageResponse {
        count,
        results: bundles
            .iter()
            .map(|bundle| EntryView::render(bundle, version))
            .collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ModerationStateView {
    pub id: i32,
    pub name: String,
}

pub async fn moderation_states(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModerationStateView>>, ApiError> {
    let states = moderation::list_states(&state.db).await?;
    Ok(Json(
        states
            .into_iter()
            .map(|s| ModerationStateView {
                id: s.id,
                name: s.name,
            })
            .collect(),
    ))
}

/// Profile id of the viewer, when they have one. Never creates.
async fn viewer_profile(
    state: &AppState,
    user: Option<&crate::modules::auth::CurrentUser>,
) -> Result<Option<i32>, ApiError> {
    match user {
        Some(user) => Ok(profiles::find_for_account(&state.db, user.account_id)
            .await?
            .map(|p| p.id)),
        None => Ok(None),
    }
}
