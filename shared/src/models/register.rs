//! Cash Register Model (收银钱箱)

use serde::{Deserialize, Serialize};

use super::denomination::DenominationInput;
use super::operator::OperatorKind;

/// Register status
///
/// `Closed` and `ForceClosed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegisterStatus {
    Open,
    Closed,
    ForceClosed,
}

impl Default for RegisterStatus {
    fn default() -> Self {
        Self::Open
    }
}

/// Cash register entity - one drawer session for one operator
///
/// Opening balances are set once at open; closing balances are set exactly
/// once at close/force-close and never mutated afterwards. Discrepancy
/// corrections are appended to the transaction ledger, not written here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashRegister {
    pub id: i64,
    pub restaurant_id: i64,
    /// Operator ID (admin user or staff, see `opened_by_kind`)
    pub opened_by: i64,
    pub opened_by_kind: OperatorKind,
    pub status: RegisterStatus,

    /// Opening float (total)
    pub opening_balance: f64,
    pub opening_cash_balance: f64,
    pub opening_upi_balance: f64,
    pub opening_card_balance: f64,

    /// Counted cash + ledger-derived UPI/card, set at close
    pub closing_balance: Option<f64>,
    pub closing_cash_balance: Option<f64>,
    pub closing_upi_balance: Option<f64>,
    pub closing_card_balance: Option<f64>,
    /// Ledger-derived expected total at close
    pub actual_balance: Option<f64>,
    /// Per-method discrepancy map, JSON-encoded [`BalanceBreakdown`]
    pub discrepancies: Option<String>,

    pub opening_notes: Option<String>,
    pub closing_notes: Option<String>,

    /// Unix timestamp millis
    pub opened_at: i64,
    pub closed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CashRegister {
    pub fn is_open(&self) -> bool {
        self.status == RegisterStatus::Open
    }
}

/// Open register payload (开箱)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterOpen {
    /// Opening cash float
    pub opening_balance: f64,
    pub notes: Option<String>,
    pub denominations: Option<DenominationInput>,
}

/// Close register payload (关箱, 盘点现金)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterClose {
    /// Physically counted cash
    pub actual_balance: f64,
    pub notes: Option<String>,
    pub denominations: Option<DenominationInput>,
}

/// Per-method balance figures (total = cash + upi + card)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceBreakdown {
    pub total: f64,
    pub cash: f64,
    pub upi: f64,
    pub card: f64,
}

/// Closing reconciliation summary, returned for audit/receipt display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCloseSummary {
    pub register_id: i64,
    pub opening: BalanceBreakdown,
    /// Ledger-derived balances at close
    pub expected: BalanceBreakdown,
    /// Physically counted cash (equals expected.cash for forced closures)
    pub counted_cash: f64,
    /// counted_cash + expected.upi + expected.card
    pub closing_balance: f64,
    /// Per-method discrepancy (counted − expected); only cash can be non-zero
    pub discrepancy: BalanceBreakdown,
    pub transaction_count: usize,
    pub forced: bool,
}

/// One currently-open register with live balances, for the status view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveRegisterView {
    pub register_id: i64,
    pub opened_by: i64,
    pub opened_by_kind: OperatorKind,
    pub opened_at: i64,
    pub opening_balance: f64,
    pub balances: BalanceBreakdown,
}

/// Register status for one operator + the restaurant-wide open set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterStatusView {
    /// The calling operator's open register, if any
    pub active: Option<ActiveRegisterView>,
    /// Every open register in the restaurant (manager overview)
    pub open_registers: Vec<ActiveRegisterView>,
}
