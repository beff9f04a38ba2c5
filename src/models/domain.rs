use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gender identity of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[serde(rename = "Non-binary", alias = "Nonbinary", alias = "NonBinary")]
    NonBinary,
}

/// Gender preference of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenderPref {
    Men,
    Women,
    Bisexual,
}

/// Error raised when the raw score rows do not form a square matrix
#[derive(Debug, Error)]
pub enum MatrixShapeError {
    #[error("row {row} has {len} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// N x N compatibility score matrix, row-major
///
/// `score(i, j)` is participant i's view of participant j. The matrix is not
/// required to be symmetric and is immutable once constructed; the engine
/// only ever reads it.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl ScoreMatrix {
    /// Build a matrix from row vectors, validating squareness
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixShapeError> {
        let n = rows.len();
        let mut cells = Vec::with_capacity(n * n);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(MatrixShapeError::RaggedRow {
                    row: i,
                    len: row.len(),
                    expected: n,
                });
            }
            cells.extend(row);
        }

        Ok(Self { n, cells })
    }

    /// Number of participants
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Participant `row`'s score of participant `col`
    ///
    /// Out-of-range indices read as 0.0 (incompatible).
    #[inline]
    pub fn score(&self, row: usize, col: usize) -> f64 {
        if row >= self.n || col >= self.n {
            return 0.0;
        }
        self.cells[row * self.n + col]
    }
}

/// One final match: a proposer paired with a receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub proposer: usize,
    pub receiver: usize,
}

/// Survey profile used by the standalone pairwise compatibility scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyUser {
    pub name: String,
    pub gender: String,
    pub preferences: Vec<String>,
    #[serde(rename = "gradYear")]
    pub grad_year: i32,
    pub responses: Vec<i32>,
}
