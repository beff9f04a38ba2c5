use crate::config::DatasetSettings;
use crate::core::{compatibility_score, MatchingError, StableMatcher};
use crate::models::{
    ErrorResponse, Gender, GenderPref, HealthResponse, RunMatchingRequest, RunMatchingResponse,
    ScoreMatrix, ScorePairRequest, ScorePairResponse, SurveyPairScore, SurveyScoresResponse,
};
use crate::services::{dataset, DatasetError};
use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: StableMatcher,
    pub dataset: DatasetSettings,
}

/// Configure all matching-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matching/run", web::post().to(run_matching))
        .route("/matching/run-dataset", web::post().to(run_matching_from_dataset))
        .route("/compatibility/score", web::post().to(score_pair))
        .route("/compatibility/survey-scores", web::get().to(survey_scores));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run matching endpoint
///
/// POST /api/v1/matching/run
///
/// Request body:
/// ```json
/// {
///   "scores": [[0.0, 0.9], [0.8, 0.0]],
///   "genderIdentities": ["Male", "Female"],
///   "genderPreferences": ["Women", "Men"],
///   "seed": 42
/// }
/// ```
async fn run_matching(
    state: web::Data<AppState>,
    req: web::Json<RunMatchingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for run_matching request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let run_id = Uuid::new_v4();
    let total_participants = req.scores.len();

    tracing::info!(
        "Starting matching run {} with {} participants",
        run_id,
        total_participants
    );

    let matrix = match ScoreMatrix::from_rows(req.scores.clone()) {
        Ok(matrix) => matrix,
        Err(e) => {
            tracing::info!("Rejected malformed matrix for run {}: {}", run_id, e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Malformed score matrix".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let matcher = match req.seed {
        Some(seed) => state.matcher.with_seed(seed),
        None => state.matcher.clone(),
    };

    execute_run(
        &matcher,
        run_id,
        &matrix,
        &req.gender_identities,
        &req.gender_preferences,
    )
}

/// Run matching over the datasets configured on the server
///
/// POST /api/v1/matching/run-dataset
///
/// Loads the score matrix and gender files from the configured paths and
/// runs one matching with the server's default options.
async fn run_matching_from_dataset(state: web::Data<AppState>) -> impl Responder {
    let (Some(scores_path), Some(identities_path), Some(preferences_path)) = (
        state.dataset.scores_path.as_ref(),
        state.dataset.identities_path.as_ref(),
        state.dataset.preferences_path.as_ref(),
    ) else {
        return HttpResponse::NotFound().json(ErrorResponse {
            error: "Dataset not configured".to_string(),
            message: "scores_path, identities_path and preferences_path must all be set".to_string(),
            status_code: 404,
        });
    };

    let run_id = Uuid::new_v4();
    tracing::info!("Starting dataset matching run {} from {}", run_id, scores_path);

    let matrix = match dataset::load_score_matrix(scores_path) {
        Ok(matrix) => matrix,
        Err(e) => return dataset_failure(run_id, e),
    };
    let identities = match dataset::load_identities(identities_path) {
        Ok(identities) => identities,
        Err(e) => return dataset_failure(run_id, e),
    };
    let preferences = match dataset::load_preferences(preferences_path) {
        Ok(preferences) => preferences,
        Err(e) => return dataset_failure(run_id, e),
    };

    execute_run(&state.matcher, run_id, &matrix, &identities, &preferences)
}

fn execute_run(
    matcher: &StableMatcher,
    run_id: Uuid,
    matrix: &ScoreMatrix,
    identities: &[Gender],
    preferences: &[GenderPref],
) -> HttpResponse {
    match matcher.run(matrix, identities, preferences) {
        Ok(outcome) => {
            tracing::info!(
                "Matching run {} produced {} pairs in {} proposals",
                run_id,
                outcome.pairs.len(),
                outcome.proposals
            );
            HttpResponse::Ok().json(RunMatchingResponse {
                run_id,
                pairs: outcome.pairs,
                proposals: outcome.proposals,
                total_participants: matrix.len(),
            })
        }
        Err(e) => {
            let status_code = match &e {
                MatchingError::AttributeLengthMismatch { .. }
                | MatchingError::OddPopulation { .. } => 400,
                MatchingError::NoCompatibleCandidate { .. }
                | MatchingError::NonTerminatingGuard { .. } => 422,
            };
            tracing::warn!("Matching run {} failed: {}", run_id, e);

            let response = ErrorResponse {
                error: "Matching failed".to_string(),
                message: e.to_string(),
                status_code,
            };
            if status_code == 400 {
                HttpResponse::BadRequest().json(response)
            } else {
                HttpResponse::UnprocessableEntity().json(response)
            }
        }
    }
}

fn dataset_failure(run_id: Uuid, e: DatasetError) -> HttpResponse {
    tracing::error!("Dataset load failed for run {}: {}", run_id, e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Failed to load dataset".to_string(),
        message: e.to_string(),
        status_code: 500,
    })
}

/// Pairwise survey score endpoint
///
/// POST /api/v1/compatibility/score
async fn score_pair(req: web::Json<ScorePairRequest>) -> impl Responder {
    let score = compatibility_score(&req.user_a, &req.user_b);

    tracing::debug!(
        "Scored {} against {}: {}",
        req.user_a.name,
        req.user_b.name,
        score
    );

    HttpResponse::Ok().json(ScorePairResponse { score })
}

/// All-pairs survey score report over the configured survey dataset
///
/// GET /api/v1/compatibility/survey-scores
async fn survey_scores(state: web::Data<AppState>) -> impl Responder {
    let Some(survey_path) = state.dataset.survey_path.as_ref() else {
        return HttpResponse::NotFound().json(ErrorResponse {
            error: "Dataset not configured".to_string(),
            message: "survey_path must be set".to_string(),
            status_code: 404,
        });
    };

    let users = match dataset::load_survey_users(survey_path) {
        Ok(users) => users,
        Err(e) => {
            tracing::error!("Survey load failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to load survey".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let mut scores = Vec::new();
    for i in 0..users.len() {
        for j in (i + 1)..users.len() {
            scores.push(SurveyPairScore {
                user_a: users[i].name.clone(),
                user_b: users[j].name.clone(),
                score: compatibility_score(&users[i], &users[j]),
            });
        }
    }

    HttpResponse::Ok().json(SurveyScoresResponse {
        scores,
        total_users: users.len(),
    })
}
