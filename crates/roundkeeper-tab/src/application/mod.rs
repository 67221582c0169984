//! Application services for the Tab context.

pub mod command_handlers;
pub mod query_handlers;
