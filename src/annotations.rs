use thiserror::Error;

use crate::stats::median;

#[derive(Debug, Error, PartialEq)]
pub enum AnnotationError {
    #[error("not a serialized numeric sequence: {0}")]
    Malformed(String),
    #[error("annotation sequence is empty")]
    Empty,
    #[error("annotation sequence contains a non-finite value")]
    NonFinite,
}

/// Parses a cell such as `[3,4,4,5]` into annotator ratings.
pub fn parse_ratings(cell: &str) -> Result<Vec<f64>, AnnotationError> {
    let values: Vec<f64> = serde_json::from_str(cell.trim())
        .map_err(|e| AnnotationError::Malformed(e.to_string()))?;
    if values.is_empty() {
        return Err(AnnotationError::Empty);
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AnnotationError::NonFinite);
    }
    Ok(values)
}

pub fn median_rating(ratings: &[f64]) -> Result<f64, AnnotationError> {
    median(ratings).ok_or(AnnotationError::Empty)
}

pub fn aggregate(cell: &str) -> Result<f64, AnnotationError> {
    let ratings = parse_ratings(cell)?;
    median_rating(&ratings)
}

#[cfg(test)]
#[path = "../tests/src_inline/annotations.rs"]
mod tests;
