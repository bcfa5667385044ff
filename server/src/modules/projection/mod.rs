//! Versioned API projections.
//!
//! Domain rows never serialize directly; every response passes through
//! a view builder keyed by the requested API version. The version only
//! changes the shape of attribution and profile data, never visibility.

pub mod entry;
pub mod profile;
pub mod version;

pub use entry::{CreatorRef, EntryView};
pub use profile::{CreatorListItem, ProfileSublists, ProfileView};
pub use version::ApiVersion;
