//! Check-In Model (员工班次)

use serde::{Deserialize, Serialize};

use super::denomination::DenominationInput;

/// Check-in status
///
/// `Stale` marks an unused placeholder row from a previous day that may be
/// recycled into a fresh `Active` record instead of inserting a new row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckInStatus {
    Active,
    Completed,
    ForceClosed,
    Stale,
}

/// One staff working shift, bound to a register while active
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CheckInRecord {
    pub id: i64,
    pub staff_id: i64,
    /// Register opened for this shift; null until one is created
    pub register_id: Option<i64>,
    /// Business date, "YYYY-MM-DD" in the restaurant timezone
    pub date: String,
    pub check_in_time: i64,
    pub check_out_time: Option<i64>,
    pub status: CheckInStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Check-in payload (上班打卡 + 开箱)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCheckIn {
    /// Opening cash float for the register opened by this shift
    pub opening_balance: f64,
    pub notes: Option<String>,
    pub denominations: Option<DenominationInput>,
}

/// Check-out payload (下班打卡 + 盘点关箱)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCheckOut {
    /// Physically counted cash
    pub actual_balance: f64,
    pub notes: Option<String>,
    pub denominations: Option<DenominationInput>,
}
