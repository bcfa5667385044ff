//! Profile API handlers.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;

use crate::api::dto::{ApiError, PageResponse};
use crate::api::servers::app_state::AppState;
use crate::api::servers::jwt_middleware::AuthenticatedUser;
use crate::modules::auth;
use crate::modules::entries;
use crate::modules::profiles::{self, ProfileFilters, ProfileRecord, UpdateProfileRequest};
use crate::modules::projection::{ApiVersion, EntryView, ProfileSublists, ProfileView};

#[derive(Debug, Deserialize)]
pub struct ProfileListQuery {
    pub ids: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
    #[serde(default)]
    pub basic: bool,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub page_size: u64,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    Query(query): Query<ProfileListQuery>,
) -> Result<Json<PageResponse<ProfileView>>, ApiError> {
    let filters = ProfileFilters {
        ids: query.ids,
        name: query.name,
        is_active: query.is_active,
        search: query.search,
        page: query.page,
        page_size: query.page_size,
    };

    let (records, count) = profiles::list(&state.db, &filters).await?;

    let mut results = Vec::with_capacity(records.len());
    for record in &records {
        let mut view = if query.basic {
            ProfileView::basic(record)
        } else {
            ProfileView::card(record)
        };

        // v1 list items inline the created entries, like the detail
        // view; later versions stay flat.
        if version == ApiVersion::V1 {
            let created = entries::created_by_profile(&state.db, record.profile.id, None).await?;
            view.created_entries = Some(render_entries(&state, created, version, None).await?);
        }

        results.push(view);
    }

    Ok(Json(PageResponse { count, results }))
}

/// Flags selecting which entry sublists a detail view inlines.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileDetailQuery {
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub favorited: bool,
    pub created_ordering: Option<String>,
    pub published_ordering: Option<String>,
}

pub async fn get(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    Path(id): Path<i32>,
    Query(query): Query<ProfileDetailQuery>,
) -> Result<Json<ProfileView>, ApiError> {
    let record = profiles::get_record(&state.db, id).await?;
    detail_view(&state, &record, version, &query, None).await
}

pub async fn my_profile(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ProfileDetailQuery>,
) -> Result<Json<ProfileView>, ApiError> {
    let account = auth::account_for(&state.db, &user).await?;
    let profile = profiles::ensure_profile(&state.db, account.id).await?;
    let record = ProfileRecord {
        profile,
        account: Some(account),
    };
    let viewer_id = record.profile.id;
    detail_view(&state, &record, version, &query, Some(viewer_id)).await
}

pub async fn update_my_profile(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileView>, ApiError> {
    let account = auth::account_for(&state.db, &user).await?;
    let profile = profiles::ensure_profile(&state.db, account.id).await?;
    let updated = profiles::update_profile(&state.db, profile, request).await?;
    let record = ProfileRecord {
        profile: updated,
        account: Some(account),
    };
    let viewer_id = record.profile.id;
    detail_view(
        &state,
        &record,
        version,
        &ProfileDetailQuery::default(),
        Some(viewer_id),
    )
    .await
}

async fn detail_view(
    state: &AppState,
    record: &ProfileRecord,
    version: ApiVersion,
    query: &ProfileDetailQuery,
    viewer_profile_id: Option<i32>,
) -> Result<Json<ProfileView>, ApiError> {
    let public_ids = entries::visible_entry_ids(&state.db).await?;
    let counts = profiles::entry_counts(&state.db, record, Some(&public_ids)).await?;

    let mut sublists = ProfileSublists::default();

    // v1 always inlines the created list; later versions only on
    // request.
    if version == ApiVersion::V1 || query.created {
        let created = entries::created_by_profile(
            &state.db,
            record.profile.id,
            query.created_ordering.as_deref(),
        )
        .await?;
        sublists.created =
            Some(render_entries(state, created, version, viewer_profile_id).await?);
    }

    if query.published {
        if let Some(account) = record.account.as_ref() {
            let published = entries::published_by_account(
                &state.db,
                account.id,
                query.published_ordering.as_deref(),
            )
            .await?;
            sublists.published =
                Some(render_entries(state, published, version, viewer_profile_id).await?);
        }
    }

    if query.favorited {
        let favorites = entries::favorited_by_profile(&state.db, record.profile.id).await?;
        sublists.favorited =
            Some(render_entries(state, favorites, version, viewer_profile_id).await?);
    }

    Ok(Json(ProfileView::detail(record, version, sublists, counts)))
}

async fn render_entries(
    state: &AppState,
    models: Vec<entity::entry::Model>,
    version: ApiVersion,
    viewer_profile_id: Option<i32>,
) -> Result<Vec<EntryView>, ApiError> {
    let bundles = entries::load_bundles(&state.db, models, viewer_profile_id).await?;
    Ok(bundles
        .iter()
        .map(|bundle| EntryView::render(bundle, version))
        .collect())
}
