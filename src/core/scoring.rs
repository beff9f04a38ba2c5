use crate::models::SurveyUser;

/// Number of survey questions the response weighting is normalized against
pub const SURVEY_LENGTH: usize = 20;

/// Pairwise compatibility score for two survey profiles
///
/// Standalone heuristic, independent of the matching engine:
/// - 0.0 if the two users are not mutually gender-compatible (each user's
///   gender must appear in the other's preference list);
/// - otherwise `0.5 - 0.25 * |gradYear difference|`, plus `0.5 / 20` for
///   each survey question the two users answered differently.
///
/// The differing-answer increment is long-standing product arithmetic and
/// is preserved as-is.
pub fn compatibility_score(a: &SurveyUser, b: &SurveyUser) -> f64 {
    if !a.preferences.contains(&b.gender) || !b.preferences.contains(&a.gender) {
        return 0.0;
    }

    let grad_diff = (a.grad_year - b.grad_year).abs() as f64;
    let mut score = 0.5 - 0.25 * grad_diff;

    for (own, other) in a.responses.iter().zip(&b.responses) {
        if own != other {
            score += 0.5 / SURVEY_LENGTH as f64;
        }
    }

    score
}
