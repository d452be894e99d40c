#![allow(dead_code)]

use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;
use ut_storage::{
    DEFAULT_DB_FILE_NAME, InsertSubtreeRequest, ListRequest, MAX_PAGE_LIMIT, NodeId, NodeIn,
    NodeOut, SqliteStore,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("ut_storage=debug".parse().expect("valid directive")),
        )
        .with_test_writer()
        .try_init();
}

pub fn open_store() -> (TempDir, SqliteStore) {
    init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let store = SqliteStore::open(dir.path()).expect("fresh store should open");
    (dir, store)
}

pub fn leaf(title: &str) -> NodeIn {
    NodeIn::leaf(title)
}

pub fn node(title: &str, children: Vec<NodeIn>) -> NodeIn {
    NodeIn::with_children(title, children)
}

pub fn insert(store: &mut SqliteStore, payload: NodeIn, before: Option<NodeId>) -> usize {
    store
        .insert_subtree(InsertSubtreeRequest { payload, before })
        .expect("insert should succeed")
}

pub fn all_nodes(store: &SqliteStore) -> Vec<NodeOut> {
    let mut out = Vec::new();
    let mut page = store
        .list_ordered(ListRequest::first(MAX_PAGE_LIMIT))
        .expect("first page");
    loop {
        out.extend(page.data);
        let Some(cursor) = page.after_cursor else {
            break;
        };
        page = store
            .list_ordered(ListRequest::after(cursor, MAX_PAGE_LIMIT))
            .expect("next page");
    }
    out
}

/// `(title, depth)` of every node in traversal order.
pub fn outline(store: &SqliteStore) -> Vec<(String, u32)> {
    all_nodes(store)
        .into_iter()
        .map(|node| (node.title, node.depth))
        .collect()
}

pub fn outline_of(expected: &[(&str, u32)]) -> Vec<(String, u32)> {
    expected
        .iter()
        .map(|(title, depth)| (title.to_string(), *depth))
        .collect()
}

pub fn id_of(store: &SqliteStore, title: &str) -> NodeId {
    all_nodes(store)
        .into_iter()
        .find(|node| node.title == title)
        .unwrap_or_else(|| panic!("node {title:?} should exist"))
        .id
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRow {
    pub id: i64,
    pub rank: String,
    pub start_id: Option<i64>,
    pub depth: i64,
    pub has_children: bool,
}

pub fn raw_rows(dir: &Path) -> Vec<RawRow> {
    let conn = Connection::open(dir.join(DEFAULT_DB_FILE_NAME)).expect("raw connection");
    let mut stmt = conn
        .prepare("SELECT id, rank, start_id, depth, has_children FROM tree ORDER BY rank ASC")
        .expect("prepare raw scan");
    let rows = stmt
        .query_map([], |row| {
            Ok(RawRow {
                id: row.get(0)?,
                rank: row.get(1)?,
                start_id: row.get(2)?,
                depth: row.get(3)?,
                has_children: row.get(4)?,
            })
        })
        .expect("raw scan")
        .collect::<Result<Vec<_>, _>>()
        .expect("raw rows");
    rows
}

/// START/END pairing, nesting, depth and `has_children` all agree with the
/// rank order of the stored rows.
pub fn assert_well_formed(dir: &Path) {
    let rows = raw_rows(dir);
    let mut open: Vec<i64> = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        match row.start_id {
            None => {
                assert_eq!(
                    row.depth,
                    open.len() as i64,
                    "start row {} has depth {} but {} open ancestors",
                    row.id,
                    row.depth,
                    open.len()
                );
                let next = rows
                    .get(index + 1)
                    .unwrap_or_else(|| panic!("start row {} has no end row", row.id));
                let has_children = next.start_id != Some(row.id);
                assert_eq!(
                    row.has_children, has_children,
                    "has_children of {} is stale",
                    row.id
                );
                open.push(row.id);
            }
            Some(start_id) => {
                let top = open.pop();
                assert_eq!(top, Some(start_id), "end row {} closes the wrong node", row.id);
                assert_eq!(row.depth, open.len() as i64, "end row {} depth", row.id);
            }
        }
    }
    assert!(open.is_empty(), "unclosed nodes: {open:?}");
}
