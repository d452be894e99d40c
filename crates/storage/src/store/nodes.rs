#![forbid(unsafe_code)]

use serde::Serialize;
use ut_core::{Gap, NodeId, Rank};

/// A node as seen by readers: the START row of a START/END pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeOut {
    pub id: NodeId,
    pub rank: Rank,
    pub depth: u32,
    pub title: String,
    pub has_children: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    pub data: Vec<NodeOut>,
    /// Set when matching nodes exist before the first one returned.
    pub before_cursor: Option<Rank>,
    /// Set when matching nodes exist after the last one returned.
    pub after_cursor: Option<Rank>,
}

/// Where new rows go: the open rank gap plus the structural parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub after_rank: Option<Rank>,
    pub before_rank: Option<Rank>,
    pub depth: u32,
    pub parent_id: Option<NodeId>,
}

impl Location {
    pub fn gap(&self) -> Gap {
        Gap::new(self.after_rank.clone(), self.before_rank.clone())
    }
}
