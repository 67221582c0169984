//! Roundkeeper event store.
//!
//! Tabs live only for the lifetime of the server process, so the store keeps
//! every stream in memory.

pub mod memory_event_repository;
