#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_TITLE_CHARS: usize = 1024;

/// Identifier of a node, i.e. the store id of its START row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(i64);

impl NodeId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeTitleError {
    TooLong,
    ContainsControl,
}

impl NodeTitleError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::TooLong => "node title is too long",
            Self::ContainsControl => "node title contains control characters",
        }
    }
}

/// Titles may span lines and carry tabs; any other control character is
/// rejected.
pub fn validate_title(value: &str) -> Result<(), NodeTitleError> {
    if value.chars().count() > MAX_TITLE_CHARS {
        return Err(NodeTitleError::TooLong);
    }
    if value
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err(NodeTitleError::ContainsControl);
    }
    Ok(())
}
