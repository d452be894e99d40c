#![forbid(unsafe_code)]

pub mod ids;
pub mod payload;
pub mod range;
pub mod rank;

pub use ids::{MAX_TITLE_CHARS, NodeId, NodeTitleError, validate_title};
pub use payload::{NodeIn, RowSlot, SlotKind};
pub use range::{Gap, RankRange};
pub use rank::{DEFAULT_RANK_WIDTH, Rank, RankError, generate_ranks};
