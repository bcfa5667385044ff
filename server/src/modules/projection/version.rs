//! API version selection.

use serde::Serialize;

/// Supported wire versions. Unversioned paths serve `V1` for legacy
/// clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ApiVersion {
    #[default]
    V1,
    V2,
    V3,
}

impl ApiVersion {
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "v1" => Some(ApiVersion::V1),
            "v2" => Some(ApiVersion::V2),
            "v3" => Some(ApiVersion::V3),
            _ => None,
        }
    }

    /// Whether attribution serializes as profile-linked objects rather
    /// than the flat v1 shapes.
    pub fn profiles_in_attribution(self) -> bool {
        !matches!(self, ApiVersion::V1)
    }
}
