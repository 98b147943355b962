//! Ordered rule evaluation for tick-driven automation.
//!
//! This crate provides a minimal, deterministic decision structure built for
//! bots that evaluate once per world tick:
//!
//! - **No delta time**: every evaluation completes within its tick
//! - **No Running state**: a rule either claims the tick or passes it on
//! - **Order is meaning**: tables are first-match, top to bottom
//! - **Zero dependencies**: pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`Rule`]: a named guard/body pair
//! - [`RuleTable`]: a first-match ordered list of rules; tables nest by
//!   firing a sub-table from a rule body

pub mod rule;
pub mod table;

pub use rule::Rule;
pub use table::RuleTable;
