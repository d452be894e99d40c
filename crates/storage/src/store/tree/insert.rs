#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::params;
use ut_core::{SlotKind, generate_ranks};

impl SqliteStore {
    /// Inserts `payload` as one subtree and returns the number of rows written.
    pub fn insert_subtree(&mut self, request: InsertSubtreeRequest) -> Result<usize, StoreError> {
        let InsertSubtreeRequest { payload, before } = request;
        payload
            .validate()
            .map_err(|err| StoreError::InvalidInput(err.message()))?;

        let tx = self.write_tx()?;
        let location = locate_tx(&tx, before)?;

        let slots = payload.row_plan(location.depth);
        let ranks = generate_ranks(
            slots.len(),
            location.after_rank.as_ref(),
            location.before_rank.as_ref(),
        )?;

        {
            let mut insert_start = tx.prepare(
                "INSERT INTO tree(rank, start_id, has_children, depth, title) \
                 VALUES (?1, NULL, ?2, ?3, ?4)",
            )?;
            let mut insert_end = tx.prepare(
                "INSERT INTO tree(rank, start_id, has_children, depth, title) \
                 VALUES (?1, ?2, 0, ?3, NULL)",
            )?;

            let mut start_ids: Vec<Option<i64>> = vec![None; slots.len()];
            for (index, (slot, rank)) in slots.iter().zip(&ranks).enumerate() {
                match slot.kind {
                    SlotKind::Start {
                        title,
                        has_children,
                    } => {
                        insert_start.execute(params![rank.as_str(), has_children, slot.depth, title])?;
                        start_ids[index] = Some(tx.last_insert_rowid());
                    }
                    SlotKind::End { start_slot } => {
                        let start_id = start_ids
                            .get(start_slot)
                            .copied()
                            .flatten()
                            .ok_or(StoreError::InvalidInput("row plan closes an unopened node"))?;
                        insert_end.execute(params![rank.as_str(), start_id, slot.depth])?;
                    }
                }
            }
        }

        if let Some(parent_id) = location.parent_id {
            refresh_has_children(&tx, parent_id)?;
        }

        tx.commit()?;
        tracing::debug!(
            rows = slots.len(),
            depth = location.depth,
            parent_id = ?location.parent_id,
            before = ?before,
            "subtree inserted"
        );
        Ok(slots.len())
    }
}
