// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Gender, GenderPref, MatrixShapeError, Pairing, ScoreMatrix, SurveyUser};
pub use requests::{RunMatchingRequest, ScorePairRequest};
pub use responses::{
    ErrorResponse, HealthResponse, RunMatchingResponse, ScorePairResponse, SurveyPairScore,
    SurveyScoresResponse,
};
