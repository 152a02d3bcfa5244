//! Cash Transaction Model (钱箱流水)
//!
//! Append-only ledger rows. Never updated or deleted once created;
//! closing discrepancies are corrected by appending new rows.

use serde::{Deserialize, Serialize};

/// Money direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxType {
    CashIn,
    CashOut,
}

/// Payment method of a ledger entry
///
/// Debit and credit cards reconcile into one "card" bucket at close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Upi,
    Debit,
    Credit,
}

/// What produced a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxSource {
    Order,
    Manual,
    Settlement,
}

/// One immutable ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashTransaction {
    pub id: i64,
    pub register_id: i64,
    pub tx_type: TxType,
    /// Positive amount; direction is carried by `tx_type`
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub source: TxSource,
    pub description: Option<String>,
    /// Operator who recorded the entry
    pub performed_by: i64,
    pub created_at: i64,
}

/// Record transaction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionCreate {
    pub tx_type: TxType,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub source: TxSource,
    pub description: Option<String>,
}
