//! Entry projection.
//!
//! Staff-only fields (`internal_notes`) never serialize, in any
//! version. Publisher identity renders as a display name, never an
//! email address.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::modules::entries::EntryBundle;
use crate::modules::projection::version::ApiVersion;

/// One attributed creator, in ledger order.
#[derive(Debug, Clone, Serialize)]
pub struct CreatorRef {
    /// Legacy alias carried by v1 payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<i32>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub id: i32,
    pub title: String,
    pub content_url: String,
    pub description: Option<String>,
    pub get_involved: Option<String>,
    pub get_involved_url: Option<String>,
    pub interest: Option<String>,
    pub featured: bool,
    pub thumbnail: Option<String>,
    pub created: DateTime<FixedOffset>,
    pub moderation_state: i32,

    /// Display name of the publisher.
    pub published_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitter_profile_id: Option<i32>,

    pub tags: Vec<String>,
    pub issues: Vec<String>,
    pub help_types: Vec<String>,

    pub bookmark_count: u64,
    pub is_bookmarked: bool,

    /// v1 only: flat creator names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creators: Option<Vec<String>>,
    /// v1 only: creator refs under the legacy alias.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_creators: Option<Vec<CreatorRef>>,
    /// v2 and later: profile-linked attribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creators_with_profiles: Option<Vec<CreatorRef>>,
}

impl EntryView {
    pub fn render(bundle: &EntryBundle, version: ApiVersion) -> Self {
        let refs: Vec<CreatorRef> = bundle
            .attributions
            .iter()
            .map(|attribution| {
                let id = attribution.profile.id;
                if version.profiles_in_attribution() {
                    CreatorRef {
                        creator_id: None,
                        profile_id: Some(id),
                        name: attribution.display_name(),
                    }
                } else {
                    CreatorRef {
                        creator_id: Some(id),
                        profile_id: None,
                        name: attribution.display_name(),
                    }
                }
            })
            .collect();

        let (creators, related_creators, creators_with_profiles) =
            if version.profiles_in_attribution() {
                (None, None, Some(refs))
            } else {
                let names = bundle
                    .attributions
                    .iter()
                    .filter_map(|a| a.display_name())
                    .collect();
                (Some(names), Some(refs), None)
            };

        EntryView {
            id: bundle.entry.id,
            title: bundle.entry.title.clone(),
            content_url: bundle.entry.content_url.clone(),
            description: bundle.entry.description.clone(),
            get_involved: bundle.entry.get_involved.clone(),
            get_involved_url: bundle.entry.get_involved_url.clone(),
            interest: bundle.entry.interest.clone(),
            featured: bundle.entry.featured,
            thumbnail: bundle.entry.thumbnail.clone(),
            created: bundle.entry.created_at,
            moderation_state: bundle.entry.moderation_state_id,
            published_by: bundle.publisher_name.clone(),
            submitter_profile_id: bundle.submitter_profile_id,
            tags: bundle.tags.clone(),
            issues: bundle.issues.clone(),
            help_types: bundle.help_types.clone(),
            bookmark_count: bundle.bookmark_count,
            is_bookmarked: bundle.is_bookmarked,
            creators,
            related_creators,
            creators_with_profiles,
        }
    }
}
