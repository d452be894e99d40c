#![forbid(unsafe_code)]

use rusqlite::ErrorCode;
use ut_core::{NodeId, RankError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[source] rusqlite::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("node not found (id={0})")]
    NotFound(NodeId),
    /// Rank generation was handed a degenerate interval. Valid callers never
    /// trigger this; it signals corrupted ranks.
    #[error("invalid rank range")]
    InvalidRange,
    #[error("node cannot be moved inside its own subtree (id={node_id})")]
    InvalidMove { node_id: NodeId },
    /// A concurrent writer won the race; retry the whole operation.
    #[error("concurrent write conflict")]
    Conflict,
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQL",
            Self::InvalidInput(message) if message.starts_with("RESET_REQUIRED") => {
                "RESET_REQUIRED"
            }
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRange => "INVALID_RANGE",
            Self::InvalidMove { .. } => "INVALID_MOVE",
            Self::Conflict => "CONFLICT",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if is_write_conflict(&value) {
            tracing::warn!(error = %value, "write conflict");
            return Self::Conflict;
        }
        Self::Sql(value)
    }
}

impl From<RankError> for StoreError {
    fn from(value: RankError) -> Self {
        match value {
            RankError::InvalidRange => {
                tracing::error!("rank generation received an inverted interval");
                Self::InvalidRange
            }
            RankError::Empty | RankError::InvalidDigit { .. } => {
                Self::InvalidInput("invalid rank")
            }
        }
    }
}

/// Busy/locked databases and rank collisions are the two ways a lost race
/// between writers surfaces from SQLite.
fn is_write_conflict(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => match code.code {
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => true,
            ErrorCode::ConstraintViolation => message
                .as_deref()
                .is_some_and(|value| value.contains("UNIQUE constraint failed: tree.rank")),
            _ => false,
        },
        _ => false,
    }
}
