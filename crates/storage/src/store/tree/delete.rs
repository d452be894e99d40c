#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::params;

impl SqliteStore {
    /// Deletes a node and every descendant: all rows in its closed interval.
    pub fn delete_subtree(&mut self, request: DeleteSubtreeRequest) -> Result<(), StoreError> {
        let DeleteSubtreeRequest { node_id } = request;

        let tx = self.write_tx()?;
        let target = node_bounds(&tx, node_id)?;
        let parent = parent_node(&tx, &target)?;

        let deleted = tx.execute(
            "DELETE FROM tree WHERE rank >= ?1 AND rank <= ?2",
            params![target.range.start().as_str(), target.range.end().as_str()],
        )?;

        if let Some(parent) = &parent {
            refresh_has_children(&tx, parent.id)?;
        }

        tx.commit()?;
        tracing::debug!(node_id = %node_id, rows = deleted, "subtree deleted");
        Ok(())
    }
}
