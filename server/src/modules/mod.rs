pub mod auth;
pub mod bookmarks;
pub mod creators;
pub mod entries;
pub mod error;
pub mod media;
pub mod moderation;
pub mod profiles;
pub mod projection;
pub mod taxonomy;
