//! Worlds the router can search.

pub mod grid;
pub mod scenarios;
