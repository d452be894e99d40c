#![forbid(unsafe_code)]

use crate::ids::{NodeTitleError, validate_title};
use serde::{Deserialize, Serialize};

/// A subtree to be inserted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIn {
    pub title: String,
    #[serde(default)]
    pub children: Vec<NodeIn>,
}

impl NodeIn {
    pub fn leaf(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(title: impl Into<String>, children: Vec<NodeIn>) -> Self {
        Self {
            title: title.into(),
            children,
        }
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0usize;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }

    /// Rows needed to store this subtree: one START and one END per node.
    pub fn row_count(&self) -> usize {
        self.node_count() * 2
    }

    pub fn validate(&self) -> Result<(), NodeTitleError> {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            validate_title(&node.title)?;
            pending.extend(node.children.iter());
        }
        Ok(())
    }

    /// Flattens the subtree into rows in rank order.
    ///
    /// Every node emits its START slot, then its children's slots, then its
    /// END slot. Consuming one ascending rank per slot therefore yields
    /// correctly nested START/END intervals.
    pub fn row_plan(&self, base_depth: u32) -> Vec<RowSlot<'_>> {
        let mut slots = Vec::with_capacity(self.row_count());
        let mut stack = vec![Frame {
            node: self,
            next_child: 0,
            start_slot: 0,
        }];
        slots.push(RowSlot::start(self, base_depth));

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let node = frame.node;
            let start_slot = frame.start_slot;
            let depth = slots[start_slot].depth;

            match node.children.get(frame.next_child) {
                Some(child) => {
                    frame.next_child += 1;
                    let child_slot = slots.len();
                    slots.push(RowSlot::start(child, depth + 1));
                    stack.push(Frame {
                        node: child,
                        next_child: 0,
                        start_slot: child_slot,
                    });
                }
                None => {
                    stack.pop();
                    slots.push(RowSlot {
                        kind: SlotKind::End { start_slot },
                        depth,
                    });
                }
            }
        }

        slots
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind<'a> {
    Start { title: &'a str, has_children: bool },
    /// Closes the node whose START sits at `start_slot` in the same plan.
    End { start_slot: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowSlot<'a> {
    pub kind: SlotKind<'a>,
    pub depth: u32,
}

impl<'a> RowSlot<'a> {
    fn start(node: &'a NodeIn, depth: u32) -> Self {
        Self {
            kind: SlotKind::Start {
                title: &node.title,
                has_children: !node.children.is_empty(),
            },
            depth,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self.kind, SlotKind::Start { .. })
    }
}

struct Frame<'a> {
    node: &'a NodeIn,
    next_child: usize,
    start_slot: usize,
}
