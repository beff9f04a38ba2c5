//! Duet Algo - Stable pairing service for the Duet matchmaking app
//!
//! This library implements deferred-acceptance (Gale-Shapley) stable
//! matching over a pairwise compatibility score matrix with gender
//! identity/preference filtering, plus the standalone survey compatibility
//! scorer and the dataset loaders that feed them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    compatibility_score, MatchOutcome, MatcherOptions, MatchingError, RoleSplit, StableMatcher,
};
pub use models::{Gender, GenderPref, Pairing, ScoreMatrix, SurveyUser};
