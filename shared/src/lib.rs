//! Shared types for the cash register engine
//!
//! Domain models and utility types used by `register-engine` and the
//! (out-of-scope) controller/frontend layers.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
