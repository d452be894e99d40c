#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::params;
use ut_core::generate_ranks;

impl SqliteStore {
    /// Moves a node with its whole subtree right before `move_before`, or to
    /// the end of the forest.
    ///
    /// Every row of the subtree gets a fresh rank inside the destination gap
    /// and its depth shifted by the same amount. Order inside the subtree is
    /// preserved because the rows are rewritten in their old rank order.
    pub fn move_subtree(&mut self, request: MoveSubtreeRequest) -> Result<(), StoreError> {
        let MoveSubtreeRequest {
            node_id,
            move_before,
        } = request;

        let tx = self.write_tx()?;
        let moved = node_bounds(&tx, node_id)?;
        let former_parent = parent_node(&tx, &moved)?;
        let location = locate_tx(&tx, move_before)?;

        if moved.range.blocks_gap(&location.gap()) {
            return Err(StoreError::InvalidMove { node_id });
        }

        let row_ids = row_ids_in(&tx, &moved.range)?;
        let ranks = generate_ranks(
            row_ids.len(),
            location.after_rank.as_ref(),
            location.before_rank.as_ref(),
        )?;
        let depth_delta = i64::from(location.depth) - i64::from(moved.depth);

        {
            let mut update =
                tx.prepare("UPDATE tree SET rank = ?2, depth = depth + ?3 WHERE id = ?1")?;
            for (id, rank) in row_ids.iter().zip(&ranks) {
                update.execute(params![id, rank.as_str(), depth_delta])?;
            }
        }

        if let Some(parent) = &former_parent {
            refresh_has_children(&tx, parent.id)?;
        }
        if let Some(parent_id) = location.parent_id {
            refresh_has_children(&tx, parent_id)?;
        }

        tx.commit()?;
        tracing::debug!(
            node_id = %node_id,
            rows = row_ids.len(),
            depth_delta,
            former_parent = ?former_parent.map(|parent| parent.id),
            parent_id = ?location.parent_id,
            "subtree moved"
        );
        Ok(())
    }
}
