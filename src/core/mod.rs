// Core algorithm exports
pub mod engine;
pub mod export;
pub mod filters;
pub mod person;
pub mod scoring;

pub use engine::{MatchOutcome, MatcherOptions, MatchingError, ProposalLedger, RoleSplit, StableMatcher};
pub use export::export_pairs;
pub use filters::apply_gender_filter;
pub use person::{partition_people, Person, RolePartition};
pub use scoring::{compatibility_score, SURVEY_LENGTH};
