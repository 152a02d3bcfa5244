//! Operator identity
//!
//! Admins and staff both open cash registers. They live in different
//! tables, so a register row stores the raw id plus a kind discriminator,
//! and the service layer works with the [`Operator`] sum type.

use serde::{Deserialize, Serialize};

/// Discriminator stored alongside `opened_by` on a register row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorKind {
    Admin,
    Staff,
}

/// An operator who can own a cash register
///
/// Both variants satisfy the same register lifecycle contract; only
/// authorization lookup differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Admin(i64),
    Staff(i64),
}

impl Operator {
    pub fn id(&self) -> i64 {
        match self {
            Operator::Admin(id) | Operator::Staff(id) => *id,
        }
    }

    pub fn kind(&self) -> OperatorKind {
        match self {
            Operator::Admin(_) => OperatorKind::Admin,
            Operator::Staff(_) => OperatorKind::Staff,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Admin(id) => write!(f, "admin:{id}"),
            Operator::Staff(id) => write!(f, "staff:{id}"),
        }
    }
}
