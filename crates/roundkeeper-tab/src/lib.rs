//! Roundkeeper — Tab bounded context.
//!
//! A tab is one social session: the people present, the drinks an admin has
//! put on the list, and the ledger of rounds bought. Standings and subtotals
//! are recomputed from the ledger on every read.

pub mod application;
pub mod domain;
