// Error types for the collaborator boundary.
//
// The alert and ranking engines themselves never fail: missing data resolves to
// zero or an empty result. Errors only surface when parsing collaborator JSON,
// touching the settings file, or validating user-authored conditions.

use std::io;

/// Errors raised at the edges of the core.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    /// An importance/commonality label outside high/medium/low (or 高/中/低).
    #[error("invalid label '{0}': expected high, medium or low")]
    InvalidLabel(String),
    /// The statistics payload did not match the snapshot schema.
    #[error("invalid statistics snapshot: {0}")]
    InvalidSnapshot(#[source] serde_json::Error),
    /// The analysed comment payload did not match the comment schema.
    #[error("invalid comment payload: {0}")]
    InvalidComments(#[source] serde_json::Error),
    /// A user-authored alert condition was rejected.
    #[error("invalid alert condition: {0}")]
    InvalidCondition(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, InsightError>;
