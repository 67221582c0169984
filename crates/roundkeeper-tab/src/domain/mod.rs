//! Domain model for the Tab context.

pub mod aggregates;
pub mod aggregation;
pub mod catalog;
pub mod commands;
pub mod events;
pub mod ledger;
pub mod roster;
pub mod session;
