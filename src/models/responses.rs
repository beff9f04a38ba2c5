use crate::models::domain::Pairing;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response for the run matching endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMatchingResponse {
    #[serde(rename = "runId")]
    pub run_id: Uuid,
    pub pairs: Vec<Pairing>,
    pub proposals: usize,
    #[serde(rename = "totalParticipants")]
    pub total_participants: usize,
}

/// Response for the pairwise score endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePairResponse {
    pub score: f64,
}

/// One scored pair in the all-pairs survey report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyPairScore {
    #[serde(rename = "userA")]
    pub user_a: String,
    #[serde(rename = "userB")]
    pub user_b: String,
    pub score: f64,
}

/// Response for the all-pairs survey score endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyScoresResponse {
    pub scores: Vec<SurveyPairScore>,
    #[serde(rename = "totalUsers")]
    pub total_users: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
