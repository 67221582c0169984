//! Roundkeeper Core — shared domain abstractions.
//!
//! This crate defines the traits and types the tab context and its adapters
//! depend on: aggregates, commands, events, the event repository port, and
//! the clock/RNG seams that keep domain logic deterministic under test.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod repository;
pub mod rng;
