pub mod prelude;

pub mod account;
pub mod bookmark;
pub mod entry;
pub mod entry_creator;
pub mod entry_help_type;
pub mod entry_issue;
pub mod entry_tag;
pub mod help_type;
pub mod issue;
pub mod moderation_state;
pub mod profile;
pub mod tag;
