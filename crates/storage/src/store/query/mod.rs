#![forbid(unsafe_code)]

mod lineage;
mod list;

pub use list::MAX_PAGE_LIMIT;

use super::*;
use rusqlite::{Connection, Params};

const NODE_SELECT: &str = "SELECT id, rank, depth, title, has_children FROM tree";

fn query_nodes(
    conn: &Connection,
    sql: &str,
    params: impl Params,
) -> Result<Vec<NodeOut>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let nodes = stmt
        .query_map(params, node_out_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(nodes)
}

fn count_rows(conn: &Connection, sql: &str) -> Result<usize, StoreError> {
    let count = conn.query_row(sql, [], |row| row.get::<_, i64>(0))?;
    usize::try_from(count).map_err(|_| StoreError::InvalidInput("negative row count"))
}
