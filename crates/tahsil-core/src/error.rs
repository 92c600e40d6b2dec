//! Engine error types.
//!
//! Only conditions that refuse a computation are errors. An unreachable goal
//! or a projection with nothing to solve are ordinary outcomes and live in
//! [`crate::projection::Projection`].

use thiserror::Error;

use crate::model::ScoringMode;

/// Errors raised by the grade engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeError {
    /// A mandatory mark is missing in a mode that forbids partial data.
    #[error("incomplete input for {mode}: missing marks for {}", .missing.join(", "))]
    IncompleteInput {
        mode: ScoringMode,
        missing: Vec<String>,
    },

    /// A custom activities weight outside `(0, 1)`.
    #[error("activities weight must lie strictly between 0 and 1, got {0}")]
    InvalidActivitiesWeight(f64),

    /// The stream has no subject table for the requested exam-only mode.
    #[error("stream '{stream}' has no subject table for {mode}")]
    MissingExamTable { stream: String, mode: ScoringMode },

    #[error("unknown stream: {0}")]
    UnknownStream(String),

    #[error("unknown subject: {0}")]
    UnknownSubject(String),

    /// A projection query the caller is contractually required to block.
    #[error("invalid projection query: {0}")]
    InvalidQuery(String),
}

impl GradeError {
    /// Subject ids the caller should highlight, if any.
    pub fn missing_subjects(&self) -> &[String] {
        match self {
            GradeError::IncompleteInput { missing, .. } => missing,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_input_lists_subjects() {
        let err = GradeError::IncompleteInput {
            mode: ScoringMode::NationalExamOnly,
            missing: vec!["math".into(), "pc".into()],
        };
        assert_eq!(
            err.to_string(),
            "incomplete input for national_exam: missing marks for math, pc"
        );
        assert_eq!(err.missing_subjects().len(), 2);
        assert!(GradeError::UnknownStream("x".into()).missing_subjects().is_empty());
    }
}
