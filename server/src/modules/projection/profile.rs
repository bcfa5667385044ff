//! Profile projection.
//!
//! Email addresses never leave the service. Extended-info fields only
//! serialize when the profile has opted in; v1 inlines the created
//! entries while v2 and later serve counts and let clients fetch the
//! sublists on demand.

use serde::Serialize;

use crate::modules::profiles::{EntryCounts, ProfileRecord};
use crate::modules::projection::entry::EntryView;
use crate::modules::projection::version::ApiVersion;

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub profile_id: i32,
    pub name: Option<String>,
    pub is_active: bool,
    pub thumbnail: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    pub enable_extended_information: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_bio_long: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,

    /// Inlined for v1; opt-in by query flag for later versions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_entries: Option<Vec<EntryView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_entries: Option<Vec<EntryView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorited_entries: Option<Vec<EntryView>>,
    /// v2 and later: counts instead of inlined entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_count: Option<EntryCountView>,
}

/// Entry sublists requested for a profile detail view.
#[derive(Debug, Clone, Default)]
pub struct ProfileSublists {
    pub created: Option<Vec<EntryView>>,
    pub published: Option<Vec<EntryView>>,
    pub favorited: Option<Vec<EntryView>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntryCountView {
    pub created: u64,
    pub published: u64,
    pub favorited: u64,
}

impl From<EntryCounts> for EntryCountView {
    fn from(counts: EntryCounts) -> Self {
        EntryCountView {
            created: counts.created,
            published: counts.published,
            favorited: counts.favorited,
        }
    }
}

impl ProfileView {
    /// Basic card used by list endpoints: identity fields only.
    pub fn basic(record: &ProfileRecord) -> Self {
        ProfileView {
            profile_id: record.profile.id,
            name: record.display_name(),
            is_active: record.profile.is_active,
            thumbnail: record.profile.thumbnail.clone(),
            user_bio: None,
            location: None,
            enable_extended_information: record.profile.enable_extended_info,
            user_bio_long: None,
            affiliation: None,
            created_entries: None,
            published_entries: None,
            favorited_entries: None,
            entry_count: None,
        }
    }

    /// List card with the short bio fields included.
    pub fn card(record: &ProfileRecord) -> Self {
        ProfileView {
            user_bio: record.profile.user_bio.clone(),
            location: record.profile.location.clone(),
            ..ProfileView::basic(record)
        }
    }

    /// Full detail view. v1 inlines the created list; later versions
    /// carry counts and only the sublists the caller asked for.
    pub fn detail(
        record: &ProfileRecord,
        version: ApiVersion,
        sublists: ProfileSublists,
        counts: EntryCounts,
    ) -> Self {
        let mut view = ProfileView::card(record);

        if record.profile.enable_extended_info {
            view.user_bio_long = record.profile.user_bio_long.clone();
            view.affiliation = record.profile.affiliation.clone();
        }

        view.created_entries = sublists.created;
        view.published_entries = sublists.published;
        view.favorited_entries = sublists.favorited;
        if version.profiles_in_attribution() {
            view.entry_count = Some(counts.into());
        }

        view
    }
}

/// Item shape for the legacy creators autocomplete.
#[derive(Debug, Clone, Serialize)]
pub struct CreatorListItem {
    /// Legacy alias, equal to `profile_id`.
    pub creator_id: i32,
    pub profile_id: i32,
    pub name: Option<String>,
}

impl CreatorListItem {
    pub fn from_record(record: &ProfileRecord) -> Self {
        CreatorListItem {
            creator_id: record.profile.id,
            profile_id: record.profile.id,
            name: record.display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use entity::profile;

    fn record(extended: bool) -> ProfileRecord {
        ProfileRecord {
            profile: profile::Model {
                id: 5,
                account_id: None,
                custom_name: Some("Pomax".to_string()),
                is_active: true,
                enable_extended_info: extended,
                user_bio: Some("short".to_string()),
                user_bio_long: Some("long".to_string()),
                affiliation: Some("org".to_string()),
                location: Some("somewhere".to_string()),
                thumbnail: None,
                created_at: Utc::now().into(),
            },
            account: None,
        }
    }

    fn counts() -> EntryCounts {
        EntryCounts {
            created: 2,
            published: 1,
            favorited: 4,
        }
    }

    #[test]
    fn extended_fields_require_opt_in() {
        let view = ProfileView::detail(
            &record(false),
            ApiVersion::V2,
            ProfileSublists::default(),
            counts(),
        );
        assert!(view.user_bio_long.is_none());
        assert!(view.affiliation.is_none());

        let view = ProfileView::detail(
            &record(true),
            ApiVersion::V2,
            ProfileSublists::default(),
            counts(),
        );
        assert_eq!(view.user_bio_long.as_deref(), Some("long"));
        assert_eq!(view.affiliation.as_deref(), Some("org"));
    }

    #[test]
    fn v1_inlines_entries_v2_counts() {
        let v1 = ProfileView::detail(
            &record(true),
            ApiVersion::V1,
            ProfileSublists {
                created: Some(vec![]),
                ..Default::default()
            },
            counts(),
        );
        assert!(v1.created_entries.is_some());
        assert!(v1.entry_count.is_none());

        let v2 = ProfileView::detail(
            &record(true),
            ApiVersion::V2,
            ProfileSublists::default(),
            counts(),
        );
        assert!(v2.created_entries.is_none());
        assert_eq!(v2.entry_count.unwrap().favorited, 4);
    }

    #[test]
    fn creator_item_carries_both_ids() {
        let item = CreatorListItem::from_record(&record(false));
        assert_eq!(item.creator_id, item.profile_id);
        assert_eq!(item.name.as_deref(), Some("Pomax"));
    }
}
