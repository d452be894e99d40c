#![forbid(unsafe_code)]

//! Lexicographic rank keys.
//!
//! A rank is a fixed-radix positional number written with the digits `a`..`z`
//! (`a` = 0, `z` = 25), most significant digit first. Comparing two ranks as
//! byte strings gives the same answer as comparing them as fractions in
//! `[0, 1)`, which is what makes plain `ORDER BY rank` recover tree order.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const RADIX: u8 = 26;

/// Width used when a bound is open and no longer key forces a wider one.
pub const DEFAULT_RANK_WIDTH: usize = 10;

const MIN_CHAR: u8 = b'a';

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rank(String);

impl Rank {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, RankError> {
        let value = value.into();
        validate_rank(&value)?;
        Ok(Self(value))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Rank {
    type Error = RankError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Rank> for String {
    fn from(value: Rank) -> Self {
        value.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RankError {
    Empty,
    InvalidDigit { ch: char, index: usize },
    /// Lower bound is not strictly below the upper bound.
    InvalidRange,
}

impl RankError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "rank must not be empty",
            Self::InvalidDigit { .. } => "rank must only contain 'a'..'z'",
            Self::InvalidRange => "rank lower bound must be below the upper bound",
        }
    }
}

impl fmt::Display for RankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDigit { ch, index } => {
                write!(f, "{} (found {ch:?} at {index})", self.message())
            }
            _ => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for RankError {}

fn validate_rank(value: &str) -> Result<(), RankError> {
    if value.is_empty() {
        return Err(RankError::Empty);
    }
    for (index, ch) in value.chars().enumerate() {
        if !ch.is_ascii_lowercase() {
            return Err(RankError::InvalidDigit { ch, index });
        }
    }
    Ok(())
}

/// Generates `count` ascending ranks strictly between `lower` and `upper`.
///
/// Open bounds stand for the all-`a` and all-`z` keys of the working width.
/// When the interval holds too few integer slots, both bounds are widened with
/// trailing `a` digits until the requested keys fit evenly.
pub fn generate_ranks(
    count: usize,
    lower: Option<&Rank>,
    upper: Option<&Rank>,
) -> Result<Vec<Rank>, RankError> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut width = lower
        .map_or(0, Rank::len)
        .max(upper.map_or(0, Rank::len));
    if lower.is_none() || upper.is_none() {
        width = width.max(DEFAULT_RANK_WIDTH);
    }

    let mut low = lower.map_or_else(|| Digits::min(width), Digits::from_rank);
    let mut high = upper.map_or_else(|| Digits::max(width), Digits::from_rank);
    low.pad_to(width);
    high.pad_to(width);

    let mut difference = high
        .checked_sub(&low)
        .filter(|difference| !difference.is_zero())
        .ok_or(RankError::InvalidRange)?;

    let count = count as u128;
    if !difference.exceeds(count) {
        let extended = width + extra_width(count + 1);
        low.pad_to(extended);
        difference.pad_to(extended);
    }

    let step = difference.div_small(count + 1);
    let mut out = Vec::with_capacity(count as usize);
    let mut current = low;
    for _ in 0..count {
        current = current
            .checked_add(&step)
            .ok_or(RankError::InvalidRange)?;
        out.push(current.to_rank());
    }

    Ok(out)
}

/// Returns the number of digits needed so that `RADIX^digits >= target`.
fn extra_width(target: u128) -> usize {
    let mut span: u128 = 1;
    let mut digits = 0usize;
    while span < target {
        span = span.saturating_mul(u128::from(RADIX));
        digits += 1;
    }
    digits
}

/// Big-endian digit array, every digit in `0..RADIX`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Digits(Vec<u8>);

impl Digits {
    fn min(width: usize) -> Self {
        Self(vec![0; width])
    }

    fn max(width: usize) -> Self {
        Self(vec![RADIX - 1; width])
    }

    fn from_rank(rank: &Rank) -> Self {
        Self(rank.as_str().bytes().map(|byte| byte - MIN_CHAR).collect())
    }

    /// Appends trailing zero digits. The value read as a fraction is unchanged.
    fn pad_to(&mut self, width: usize) {
        if self.0.len() < width {
            self.0.resize(width, 0);
        }
    }

    fn is_zero(&self) -> bool {
        self.0.iter().all(|digit| *digit == 0)
    }

    /// True when the integer value is strictly greater than `bound`.
    fn exceeds(&self, bound: u128) -> bool {
        let mut value: u128 = 0;
        for digit in &self.0 {
            value = value
                .saturating_mul(u128::from(RADIX))
                .saturating_add(u128::from(*digit));
            if value > bound {
                return true;
            }
        }
        false
    }

    fn checked_sub(&self, other: &Self) -> Option<Self> {
        debug_assert_eq!(self.0.len(), other.0.len());
        let mut out = vec![0u8; self.0.len()];
        let mut borrow = 0u8;
        for index in (0..self.0.len()).rev() {
            let subtrahend = other.0[index] + borrow;
            if self.0[index] >= subtrahend {
                out[index] = self.0[index] - subtrahend;
                borrow = 0;
            } else {
                out[index] = self.0[index] + RADIX - subtrahend;
                borrow = 1;
            }
        }
        (borrow == 0).then_some(Self(out))
    }

    fn checked_add(&self, other: &Self) -> Option<Self> {
        debug_assert_eq!(self.0.len(), other.0.len());
        let mut out = vec![0u8; self.0.len()];
        let mut carry = 0u8;
        for index in (0..self.0.len()).rev() {
            let sum = self.0[index] + other.0[index] + carry;
            out[index] = sum % RADIX;
            carry = sum / RADIX;
        }
        (carry == 0).then_some(Self(out))
    }

    fn div_small(&self, divisor: u128) -> Self {
        let mut out = Vec::with_capacity(self.0.len());
        let mut remainder: u128 = 0;
        for digit in &self.0 {
            let current = remainder * u128::from(RADIX) + u128::from(*digit);
            out.push((current / divisor) as u8);
            remainder = current % divisor;
        }
        Self(out)
    }

    fn to_rank(&self) -> Rank {
        Rank(self.0.iter().map(|digit| char::from(MIN_CHAR + digit)).collect())
    }
}
