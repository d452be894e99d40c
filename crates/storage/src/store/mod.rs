#![forbid(unsafe_code)]

mod config;
mod error;
mod nodes;
mod query;
mod requests;
mod support;
mod tree;

pub use config::*;
pub use error::StoreError;
pub use nodes::*;
pub use query::MAX_PAGE_LIMIT;
pub use requests::*;

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, TransactionBehavior, params};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use support::*;
use ut_core::{NodeId, Rank};

const TREE_SCHEMA_VERSION: i64 = 1;

/// Tree store backed by one SQLite database.
///
/// Every mutation runs in its own `BEGIN IMMEDIATE` transaction, so the rows
/// a mutation reads to pick its ranks cannot change before it writes them.
/// Open one store per thread to mutate in parallel.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: Option<PathBuf>,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_config(&StoreConfig::new(storage_dir.as_ref()))
    }

    pub fn open_with_config(config: &StoreConfig) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.storage_dir)?;

        let db_path = config.db_path();
        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(config.busy_timeout())?;
        let journal_mode =
            conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get::<_, String>(0))?;
        conn.execute_batch("PRAGMA synchronous=NORMAL; PRAGMA foreign_keys = ON;")?;

        preflight_gate(&conn)?;
        install_schema(&conn)?;
        tracing::info!(path = %db_path.display(), journal_mode = %journal_mode, "tree store opened");

        Ok(Self {
            conn,
            storage_dir: Some(config.storage_dir.clone()),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        install_schema(&conn)?;
        Ok(Self {
            conn,
            storage_dir: None,
        })
    }

    /// `None` for in-memory stores.
    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }

    /// Resolves where a subtree inserted before `before` would land.
    pub fn locate(&self, before: Option<NodeId>) -> Result<Location, StoreError> {
        let tx = self.read_tx()?;
        let location = locate_tx(&tx, before)?;
        tx.commit()?;
        Ok(location)
    }

    fn write_tx(&mut self) -> Result<Transaction<'_>, StoreError> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }

    fn read_tx(&self) -> Result<Transaction<'_>, StoreError> {
        Ok(self.conn.unchecked_transaction()?)
    }
}

/// Refuses databases this store did not lay out.
///
/// An empty file passes. Otherwise exactly `store_state` and `tree` must
/// exist, the state row must carry [`TREE_SCHEMA_VERSION`] and `tree.rank`
/// must be covered by a single-column unique index.
fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<BTreeSet<_>, _>>()?;
    drop(stmt);
    if tables.is_empty() {
        return Ok(());
    }

    let expected = BTreeSet::from(["store_state".to_string(), "tree".to_string()]);
    if tables != expected {
        let reason = if tables.is_subset(&expected) {
            "RESET_REQUIRED: required table is missing"
        } else {
            "RESET_REQUIRED: unsupported tables detected"
        };
        tracing::warn!(tables = ?tables, "tree store preflight rejected database");
        return Err(StoreError::InvalidInput(reason));
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM store_state WHERE singleton = 1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .ok_or(StoreError::InvalidInput(
            "RESET_REQUIRED: schema state row is missing",
        ))?;
    if version != TREE_SCHEMA_VERSION {
        tracing::warn!(version, expected = TREE_SCHEMA_VERSION, "tree schema version mismatch");
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version mismatch",
        ));
    }

    if !rank_is_unique(conn)? {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: tree.rank is not unique",
        ));
    }
    Ok(())
}

/// Rank order is only total when no two rows can share a rank.
fn rank_is_unique(conn: &Connection) -> Result<bool, StoreError> {
    Ok(conn.query_row(
        "SELECT EXISTS ( \
             SELECT 1 FROM pragma_index_list('tree') AS il \
             WHERE il.\"unique\" = 1 \
               AND (SELECT group_concat(ii.name) FROM pragma_index_info(il.name) AS ii) = 'rank' \
         )",
        [],
        |row| row.get::<_, bool>(0),
    )?)
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    let now_ms = now_ms();

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS store_state (
          singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
          schema_version INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tree (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          rank TEXT NOT NULL UNIQUE,
          start_id INTEGER UNIQUE REFERENCES tree(id),
          has_children INTEGER NOT NULL DEFAULT 0,
          depth INTEGER NOT NULL,
          title TEXT,
          CHECK(depth >= 0),
          CHECK((start_id IS NULL) = (title IS NOT NULL)),
          CHECK(start_id IS NULL OR has_children = 0)
        );

        CREATE INDEX IF NOT EXISTS idx_tree_start_depth_rank
          ON tree(depth, rank) WHERE start_id IS NULL;
        "#,
    )?;

    let inserted = conn.execute(
        "INSERT INTO store_state(singleton, schema_version, created_at_ms, updated_at_ms) \
         VALUES (1, ?1, ?2, ?2) \
         ON CONFLICT(singleton) DO UPDATE SET schema_version=excluded.schema_version, updated_at_ms=excluded.updated_at_ms",
        params![TREE_SCHEMA_VERSION, now_ms],
    )?;
    tracing::debug!(
        schema_version = TREE_SCHEMA_VERSION,
        inserted,
        "tree schema installed"
    );

    Ok(())
}

fn node_out_from_row(row: &Row<'_>) -> rusqlite::Result<NodeOut> {
    Ok(NodeOut {
        id: NodeId::new(row.get::<_, i64>(0)?),
        rank: rank_column(row, 1)?,
        depth: row.get::<_, u32>(2)?,
        title: row.get::<_, String>(3)?,
        has_children: row.get::<_, bool>(4)?,
    })
}

fn rank_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Rank> {
    let value = row.get::<_, String>(index)?;
    Rank::try_new(value)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}

fn optional_rank_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<Rank>> {
    match row.get::<_, Option<String>>(index)? {
        Some(value) => Rank::try_new(value).map(Some).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
        }),
        None => Ok(None),
    }
}

fn to_sqlite_i64(value: usize) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::InvalidInput("value exceeds SQLite integer range"))
}

/// Milliseconds since the Unix epoch; 0 if the clock reads before it.
fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
