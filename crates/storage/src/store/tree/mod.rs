#![forbid(unsafe_code)]

mod delete;
mod insert;
mod relocate;
