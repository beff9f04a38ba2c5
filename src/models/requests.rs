use crate::models::domain::{Gender, GenderPref, SurveyUser};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to run one stable matching over a full population
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunMatchingRequest {
    /// Row-major N x N score matrix; row i is participant i's view
    #[validate(length(min = 2))]
    pub scores: Vec<Vec<f64>>,
    #[serde(alias = "gender_identities", rename = "genderIdentities")]
    pub gender_identities: Vec<Gender>,
    #[serde(alias = "gender_preferences", rename = "genderPreferences")]
    pub gender_preferences: Vec<GenderPref>,
    /// Opt-in seeded shuffle of the proposer/receiver split
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Request to score one pair of survey profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePairRequest {
    #[serde(alias = "user_a", rename = "userA")]
    pub user_a: SurveyUser,
    #[serde(alias = "user_b", rename = "userB")]
    pub user_b: SurveyUser,
}
