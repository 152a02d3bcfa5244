//! Data models
//!
//! Shared between register-engine and the controller layer (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY, snowflake-generated).

pub mod check_in;
pub mod denomination;
pub mod operator;
pub mod register;
pub mod restaurant;
pub mod transaction;

// Re-exports
pub use check_in::*;
pub use denomination::*;
pub use operator::*;
pub use register::*;
pub use restaurant::*;
pub use transaction::*;
