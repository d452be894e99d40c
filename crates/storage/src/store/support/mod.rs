#![forbid(unsafe_code)]

mod locate;
mod ranges;

pub(super) use locate::*;
pub(super) use ranges::*;
