#![forbid(unsafe_code)]

//! Interval arithmetic over START/END rank pairs.
//!
//! A node owns the closed interval `[start, end]` of its two marker rows.
//! Everything strictly inside belongs to its descendants, so ancestry and
//! parent discovery reduce to comparisons on these intervals.

use crate::rank::{Rank, RankError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankRange {
    start: Rank,
    end: Rank,
}

impl RankRange {
    pub fn try_new(start: Rank, end: Rank) -> Result<Self, RankError> {
        if start >= end {
            return Err(RankError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &Rank {
        &self.start
    }

    pub fn end(&self) -> &Rank {
        &self.end
    }

    /// True when `rank` lies strictly inside, i.e. belongs to a descendant.
    pub fn contains(&self, rank: &Rank) -> bool {
        &self.start < rank && rank < &self.end
    }

    /// True when `rank` lies in the closed interval, marker rows included.
    pub fn covers(&self, rank: &Rank) -> bool {
        &self.start <= rank && rank <= &self.end
    }

    /// True when `other` is the interval of a strict descendant.
    pub fn encloses(&self, other: &RankRange) -> bool {
        self.contains(&other.start) && self.contains(&other.end)
    }

    /// True when placing rows in `gap` would put them inside this interval.
    ///
    /// An open side of the gap never overlaps.
    pub fn blocks_gap(&self, gap: &Gap) -> bool {
        match (&gap.after, &gap.before) {
            (Some(after), Some(before)) => before <= &self.end && &self.start <= after,
            _ => false,
        }
    }
}

/// Open rank interval between two adjacent rows; `None` is an open side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gap {
    pub after: Option<Rank>,
    pub before: Option<Rank>,
}

impl Gap {
    pub fn new(after: Option<Rank>, before: Option<Rank>) -> Self {
        Self { after, before }
    }

    pub fn contains(&self, rank: &Rank) -> bool {
        self.after.as_ref().is_none_or(|after| after < rank)
            && self.before.as_ref().is_none_or(|before| rank < before)
    }
}
