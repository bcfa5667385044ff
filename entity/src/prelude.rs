pub use super::account::Entity as Account;
pub use super::bookmark::Entity as Bookmark;
pub use super::entry::Entity as Entry;
pub use super::entry_creator::Entity as EntryCreator;
pub use super::entry_help_type::Entity as EntryHelpType;
pub use super::entry_issue::Entity as EntryIssue;
pub use super::entry_tag::Entity as EntryTag;
pub use super::help_type::Entity as HelpType;
pub use super::issue::Entity as Issue;
pub use super::moderation_state::Entity as ModerationState;
pub use super::profile::Entity as Profile;
pub use super::tag::Entity as Tag;
