//! Roundkeeper — HTTP API.
//!
//! Exposes the Tab context over JSON. `main.rs` wires the production clock,
//! RNG, and in-memory event store into [`state::AppState`].

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
