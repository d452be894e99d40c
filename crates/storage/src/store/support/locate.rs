#![forbid(unsafe_code)]

use super::super::*;
use super::ranges::{enclosing_node, last_rank, node_bounds, preceding_rank};
use rusqlite::Connection;
use ut_core::NodeId;

/// Finds the gap right before `before` (or after the last row) and the node
/// that structurally encloses it.
///
/// The parent is derived from interval containment alone; no row stores a
/// parent pointer.
pub(in crate::store) fn locate_tx(
    conn: &Connection,
    before: Option<NodeId>,
) -> Result<Location, StoreError> {
    let Some(before_id) = before else {
        return Ok(Location {
            after_rank: last_rank(conn)?,
            before_rank: None,
            depth: 0,
            parent_id: None,
        });
    };

    let target = node_bounds(conn, before_id)?;
    let before_rank = target.range.start().clone();

    let Some(after_rank) = preceding_rank(conn, &before_rank)? else {
        return Ok(Location {
            after_rank: None,
            before_rank: Some(before_rank),
            depth: 0,
            parent_id: None,
        });
    };

    let parent = enclosing_node(conn, &after_rank, &before_rank)?;
    Ok(Location {
        after_rank: Some(after_rank),
        before_rank: Some(before_rank),
        depth: parent.as_ref().map_or(0, |parent| parent.depth + 1),
        parent_id: parent.map(|parent| parent.id),
    })
}
