#![forbid(unsafe_code)]

use ut_core::{NodeId, NodeIn, Rank};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertSubtreeRequest {
    pub payload: NodeIn,
    /// Insert immediately before this node; `None` appends to the forest.
    pub before: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveSubtreeRequest {
    pub node_id: NodeId,
    /// Move immediately before this node; `None` moves to the end of the forest.
    pub move_before: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteSubtreeRequest {
    pub node_id: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageCursor {
    /// Rows ranked strictly after this rank.
    After(Rank),
    /// Rows ranked strictly before this rank.
    Before(Rank),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRequest {
    pub cursor: Option<PageCursor>,
    pub limit: usize,
    pub min_depth: Option<u32>,
    pub max_depth: Option<u32>,
}

impl ListRequest {
    pub fn first(limit: usize) -> Self {
        Self {
            cursor: None,
            limit,
            min_depth: None,
            max_depth: None,
        }
    }

    pub fn after(rank: Rank, limit: usize) -> Self {
        Self {
            cursor: Some(PageCursor::After(rank)),
            ..Self::first(limit)
        }
    }

    pub fn before(rank: Rank, limit: usize) -> Self {
        Self {
            cursor: Some(PageCursor::Before(rank)),
            ..Self::first(limit)
        }
    }
}
