use crate::models::{Gender, GenderPref, MatrixShapeError, ScoreMatrix, SurveyUser};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading matching datasets
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid survey document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed score matrix: {0}")]
    Shape(#[from] MatrixShapeError),
    #[error("line {line}: could not parse '{token}' as a score")]
    BadScore { line: usize, token: String },
    #[error("line {line}: unknown gender identity '{token}'")]
    UnknownIdentity { line: usize, token: String },
    #[error("line {line}: unknown gender preference '{token}'")]
    UnknownPreference { line: usize, token: String },
}

/// Parse a whitespace-separated score matrix, one row per line
///
/// Blank lines are skipped; squareness is validated by the matrix
/// constructor.
pub fn parse_score_matrix(text: &str) -> Result<ScoreMatrix, DatasetError> {
    let mut rows = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| DatasetError::BadScore {
                    line: line_no + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
    }

    Ok(ScoreMatrix::from_rows(rows)?)
}

/// Parse a gender-identity file, one token per line
pub fn parse_identities(text: &str) -> Result<Vec<Gender>, DatasetError> {
    non_blank_lines(text)
        .map(|(line_no, token)| match token {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Non-binary" | "Nonbinary" => Ok(Gender::NonBinary),
            _ => Err(DatasetError::UnknownIdentity {
                line: line_no,
                token: token.to_string(),
            }),
        })
        .collect()
}

/// Parse a gender-preference file, one token per line
pub fn parse_preferences(text: &str) -> Result<Vec<GenderPref>, DatasetError> {
    non_blank_lines(text)
        .map(|(line_no, token)| match token {
            "Men" => Ok(GenderPref::Men),
            "Women" => Ok(GenderPref::Women),
            "Bisexual" => Ok(GenderPref::Bisexual),
            _ => Err(DatasetError::UnknownPreference {
                line: line_no,
                token: token.to_string(),
            }),
        })
        .collect()
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

#[derive(Debug, Deserialize)]
struct SurveyDocument {
    users: Vec<SurveyUser>,
}

/// Parse a survey JSON document of the form `{"users": [...]}`
pub fn parse_survey_users(text: &str) -> Result<Vec<SurveyUser>, DatasetError> {
    let document: SurveyDocument = serde_json::from_str(text)?;
    Ok(document.users)
}

pub fn load_score_matrix<P: AsRef<Path>>(path: P) -> Result<ScoreMatrix, DatasetError> {
    parse_score_matrix(&read(path)?)
}

pub fn load_identities<P: AsRef<Path>>(path: P) -> Result<Vec<Gender>, DatasetError> {
    parse_identities(&read(path)?)
}

pub fn load_preferences<P: AsRef<Path>>(path: P) -> Result<Vec<GenderPref>, DatasetError> {
    parse_preferences(&read(path)?)
}

pub fn load_survey_users<P: AsRef<Path>>(path: P) -> Result<Vec<SurveyUser>, DatasetError> {
    parse_survey_users(&read(path)?)
}

fn read<P: AsRef<Path>>(path: P) -> Result<String, DatasetError> {
    std::fs::read_to_string(path.as_ref()).map_err(|source| DatasetError::Io {
        path: path.as_ref().display().to_string(),
        source,
    })
}
