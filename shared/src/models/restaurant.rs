//! Restaurant / staff models (tenant scoping)
//!
//! The engine only reads these for authorization, business-day math and
//! EOD scoping; full roster CRUD lives outside this crate.

use serde::{Deserialize, Serialize};

/// One tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    /// IANA timezone name, e.g. "Asia/Kolkata"
    pub timezone: String,
    /// Business day boundary, "HH:MM" local time
    pub business_day_cutoff: String,
    pub created_at: i64,
}

/// Staff roster row (minimal projection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Staff {
    pub id: i64,
    pub restaurant_id: i64,
    pub display_name: String,
    pub active: bool,
}
