#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::{Connection, OptionalExtension, Row, params};
use ut_core::{NodeId, Rank, RankRange};

/// A node's id, its closed `[START, END]` rank interval and its depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::store) struct NodeBounds {
    pub id: NodeId,
    pub range: RankRange,
    pub depth: u32,
}

const BOUNDS_SELECT: &str = "SELECT s.id, s.rank, e.rank, s.depth \
     FROM tree AS s JOIN tree AS e ON e.start_id = s.id";

fn bounds_from_row(row: &Row<'_>) -> rusqlite::Result<NodeBounds> {
    let start = rank_column(row, 1)?;
    let end = rank_column(row, 2)?;
    let range = RankRange::try_new(start, end).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(err))
    })?;
    Ok(NodeBounds {
        id: NodeId::new(row.get::<_, i64>(0)?),
        range,
        depth: row.get::<_, u32>(3)?,
    })
}

/// Fails with `NotFound` when the id is unknown, names an END row, or its END
/// row is missing.
pub(in crate::store) fn node_bounds(
    conn: &Connection,
    node_id: NodeId,
) -> Result<NodeBounds, StoreError> {
    conn.query_row(
        &format!("{BOUNDS_SELECT} WHERE s.id = ?1 AND s.start_id IS NULL"),
        params![node_id.get()],
        bounds_from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound(node_id))
}

/// Rank of the row (START or END) immediately preceding `rank`.
pub(in crate::store) fn preceding_rank(
    conn: &Connection,
    rank: &Rank,
) -> Result<Option<Rank>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT rank FROM tree WHERE rank < ?1 ORDER BY rank DESC LIMIT 1",
            params![rank.as_str()],
            |row| rank_column(row, 0),
        )
        .optional()?)
}

pub(in crate::store) fn last_rank(conn: &Connection) -> Result<Option<Rank>, StoreError> {
    Ok(conn.query_row("SELECT MAX(rank) FROM tree", [], |row| {
        optional_rank_column(row, 0)
    })?)
}

/// Innermost node whose interval holds the whole gap `(after, before)`.
///
/// `after` may be the node's own START (the gap opens its child list) and
/// `before` may be its own END (the gap closes it).
pub(in crate::store) fn enclosing_node(
    conn: &Connection,
    after: &Rank,
    before: &Rank,
) -> Result<Option<NodeBounds>, StoreError> {
    Ok(conn
        .query_row(
            &format!(
                "{BOUNDS_SELECT} WHERE s.rank <= ?1 AND e.rank >= ?2 ORDER BY s.rank DESC LIMIT 1"
            ),
            params![after.as_str(), before.as_str()],
            bounds_from_row,
        )
        .optional()?)
}

/// Innermost node strictly enclosing `node`, i.e. its parent.
pub(in crate::store) fn parent_node(
    conn: &Connection,
    node: &NodeBounds,
) -> Result<Option<NodeBounds>, StoreError> {
    Ok(conn
        .query_row(
            &format!(
                "{BOUNDS_SELECT} WHERE s.rank < ?1 AND e.rank > ?2 ORDER BY s.rank DESC LIMIT 1"
            ),
            params![node.range.start().as_str(), node.range.end().as_str()],
            bounds_from_row,
        )
        .optional()?)
}

/// Ids of every row in the closed interval, in rank order.
pub(in crate::store) fn row_ids_in(
    conn: &Connection,
    range: &RankRange,
) -> Result<Vec<i64>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id FROM tree WHERE rank >= ?1 AND rank <= ?2 ORDER BY rank ASC",
    )?;
    let ids = stmt
        .query_map(params![range.start().as_str(), range.end().as_str()], |row| {
            row.get::<_, i64>(0)
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Recomputes `has_children` from the rows currently inside the node.
pub(in crate::store) fn refresh_has_children(
    conn: &Connection,
    node_id: NodeId,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE tree SET has_children = EXISTS ( \
             SELECT 1 FROM tree AS c \
             WHERE c.start_id IS NULL \
               AND c.rank > (SELECT rank FROM tree WHERE id = ?1) \
               AND c.rank < (SELECT rank FROM tree WHERE start_id = ?1) \
         ) \
         WHERE id = ?1",
        params![node_id.get()],
    )?;
    Ok(())
}
