//! Service layer
//!
//! Each operation validates its payload, runs inside exactly one store
//! transaction, and broadcasts a sync event only after commit.

pub mod registers;
pub mod shifts;
