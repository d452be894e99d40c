#![forbid(unsafe_code)]

//! SQLite-backed ordered tree.
//!
//! Every node is stored as a START row and an END row whose ranks bracket the
//! node's descendants. Sibling order, ancestry and depth are all recovered
//! from rank comparisons; no row points at its parent.

mod store;

pub use store::*;
pub use ut_core::{NodeId, NodeIn, Rank};
