#![forbid(unsafe_code)]

use super::super::*;
use super::{NODE_SELECT, count_rows, query_nodes};
use rusqlite::{OptionalExtension, params};
use ut_core::NodeId;

impl SqliteStore {
    pub fn get_node(&self, node_id: NodeId) -> Result<NodeOut, StoreError> {
        self.conn
            .query_row(
                &format!("{NODE_SELECT} WHERE id = ?1 AND start_id IS NULL"),
                params![node_id.get()],
                node_out_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound(node_id))
    }

    /// Direct children in sibling order; `None` lists the forest roots.
    pub fn children_of(&self, parent: Option<NodeId>) -> Result<Vec<NodeOut>, StoreError> {
        let Some(parent_id) = parent else {
            return query_nodes(
                &self.conn,
                &format!("{NODE_SELECT} WHERE start_id IS NULL AND depth = 0 ORDER BY rank ASC"),
                [],
            );
        };

        let tx = self.read_tx()?;
        let parent = node_bounds(&tx, parent_id)?;
        let children = query_nodes(
            &tx,
            &format!(
                "{NODE_SELECT} WHERE start_id IS NULL AND rank > ?1 AND rank < ?2 \
                 AND depth = ?3 ORDER BY rank ASC"
            ),
            params![
                parent.range.start().as_str(),
                parent.range.end().as_str(),
                parent.depth + 1
            ],
        )?;
        tx.commit()?;
        Ok(children)
    }

    pub fn parent_of(&self, node_id: NodeId) -> Result<Option<NodeOut>, StoreError> {
        let tx = self.read_tx()?;
        let node = node_bounds(&tx, node_id)?;
        let parent = match parent_node(&tx, &node)? {
            Some(parent) => Some(
                tx.query_row(
                    &format!("{NODE_SELECT} WHERE id = ?1"),
                    params![parent.id.get()],
                    node_out_from_row,
                )?,
            ),
            None => None,
        };
        tx.commit()?;
        Ok(parent)
    }

    /// Every node whose interval strictly contains `node_id`, root first.
    pub fn ancestors_of(&self, node_id: NodeId) -> Result<Vec<NodeOut>, StoreError> {
        let tx = self.read_tx()?;
        let node = node_bounds(&tx, node_id)?;
        let ancestors = query_nodes(
            &tx,
            "SELECT s.id, s.rank, s.depth, s.title, s.has_children \
             FROM tree AS s JOIN tree AS e ON e.start_id = s.id \
             WHERE s.rank < ?1 AND e.rank > ?2 ORDER BY s.rank ASC",
            params![node.range.start().as_str(), node.range.end().as_str()],
        )?;
        tx.commit()?;
        Ok(ancestors)
    }

    /// Every node strictly inside `node_id`, in traversal order.
    pub fn descendants_of(&self, node_id: NodeId) -> Result<Vec<NodeOut>, StoreError> {
        let tx = self.read_tx()?;
        let node = node_bounds(&tx, node_id)?;
        let descendants = query_nodes(
            &tx,
            &format!(
                "{NODE_SELECT} WHERE start_id IS NULL AND rank > ?1 AND rank < ?2 \
                 ORDER BY rank ASC"
            ),
            params![node.range.start().as_str(), node.range.end().as_str()],
        )?;
        tx.commit()?;
        Ok(descendants)
    }

    pub fn is_ancestor(&self, ancestor: NodeId, descendant: NodeId) -> Result<bool, StoreError> {
        let tx = self.read_tx()?;
        let outer = node_bounds(&tx, ancestor)?;
        let inner = node_bounds(&tx, descendant)?;
        tx.commit()?;
        Ok(outer.range.encloses(&inner.range))
    }

    /// Number of nodes (START rows).
    pub fn node_count(&self) -> Result<usize, StoreError> {
        count_rows(&self.conn, "SELECT COUNT(*) FROM tree WHERE start_id IS NULL")
    }

    /// Number of stored rows, START and END markers alike.
    pub fn row_count(&self) -> Result<usize, StoreError> {
        count_rows(&self.conn, "SELECT COUNT(*) FROM tree")
    }
}
