// Service exports
pub mod dataset;

pub use dataset::{
    load_identities, load_preferences, load_score_matrix, load_survey_users, parse_identities,
    parse_preferences, parse_score_matrix, parse_survey_users, DatasetError,
};
