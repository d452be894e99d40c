#![forbid(unsafe_code)]

use super::super::*;
use super::{NODE_SELECT, query_nodes};
use rusqlite::{Connection, params};

pub const MAX_PAGE_LIMIT: usize = 1000;

impl SqliteStore {
    /// Lists nodes in traversal order, one page at a time.
    ///
    /// Cursors are ranks: `After(r)` continues forward past `r`, `Before(r)`
    /// walks back from `r`. The returned page carries a cursor for each
    /// direction in which more matching nodes exist.
    pub fn list_ordered(&self, request: ListRequest) -> Result<Page, StoreError> {
        let ListRequest {
            cursor,
            limit,
            min_depth,
            max_depth,
        } = request;

        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(StoreError::InvalidInput("limit must be within 1..=1000"));
        }
        let min_depth = min_depth.unwrap_or(0);
        let max_depth = max_depth.unwrap_or(u32::MAX);
        if min_depth > max_depth {
            return Err(StoreError::InvalidInput("min_depth must not exceed max_depth"));
        }
        let limit = to_sqlite_i64(limit)?;

        let tx = self.read_tx()?;
        let data = match &cursor {
            Some(PageCursor::Before(rank)) => {
                let mut nodes = query_nodes(
                    &tx,
                    &format!(
                        "{NODE_SELECT} WHERE start_id IS NULL AND rank < ?1 \
                         AND depth BETWEEN ?2 AND ?3 ORDER BY rank DESC LIMIT ?4"
                    ),
                    params![rank.as_str(), min_depth, max_depth, limit],
                )?;
                nodes.reverse();
                nodes
            }
            Some(PageCursor::After(rank)) => query_nodes(
                &tx,
                &format!(
                    "{NODE_SELECT} WHERE start_id IS NULL AND rank > ?1 \
                     AND depth BETWEEN ?2 AND ?3 ORDER BY rank ASC LIMIT ?4"
                ),
                params![rank.as_str(), min_depth, max_depth, limit],
            )?,
            None => query_nodes(
                &tx,
                &format!(
                    "{NODE_SELECT} WHERE start_id IS NULL \
                     AND depth BETWEEN ?1 AND ?2 ORDER BY rank ASC LIMIT ?3"
                ),
                params![min_depth, max_depth, limit],
            )?,
        };

        let before_cursor = match data.first() {
            Some(first) if matching_exists(&tx, "<", &first.rank, min_depth, max_depth)? => {
                Some(first.rank.clone())
            }
            _ => None,
        };
        let after_cursor = match data.last() {
            Some(last) if matching_exists(&tx, ">", &last.rank, min_depth, max_depth)? => {
                Some(last.rank.clone())
            }
            _ => None,
        };

        tx.commit()?;
        Ok(Page {
            data,
            before_cursor,
            after_cursor,
        })
    }
}

fn matching_exists(
    conn: &Connection,
    op: &'static str,
    rank: &Rank,
    min_depth: u32,
    max_depth: u32,
) -> Result<bool, StoreError> {
    Ok(conn.query_row(
        &format!(
            "SELECT EXISTS (SELECT 1 FROM tree WHERE start_id IS NULL AND rank {op} ?1 \
             AND depth BETWEEN ?2 AND ?3)"
        ),
        params![rank.as_str(), min_depth, max_depth],
        |row| row.get::<_, bool>(0),
    )?)
}
