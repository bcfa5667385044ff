//! Creator attribution: identity resolution and the ordered ledger.

pub mod ledger;
pub mod resolver;

pub use ledger::{attributions_for, set_attributions, Attribution};
pub use resolver::{resolve_candidates, validate_candidates, CreatorCandidate, ResolvedCreator};
