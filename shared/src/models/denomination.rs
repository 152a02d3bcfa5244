//! Denomination Model (面额盘点)
//!
//! Physical note/coin counts supporting a balance figure, for audit only.
//! One optional breakdown per register, rewritten at open and close.

use serde::{Deserialize, Serialize};

/// Note values in rupees, matching the column order of [`DenominationInput`]
const NOTE_VALUES: [i64; 6] = [500, 200, 100, 50, 20, 10];

/// Stored note/coin counts for one register
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Denominations {
    pub id: i64,
    pub register_id: i64,
    pub note500: i64,
    pub note200: i64,
    pub note100: i64,
    pub note50: i64,
    pub note20: i64,
    pub note10: i64,
    /// ₹1 coins
    pub coins: i64,
    pub coins2: i64,
    pub coins5: i64,
    pub total: f64,
    pub updated_at: i64,
}

/// Denomination counts supplied at open/close
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DenominationInput {
    #[serde(default)]
    pub note500: i64,
    #[serde(default)]
    pub note200: i64,
    #[serde(default)]
    pub note100: i64,
    #[serde(default)]
    pub note50: i64,
    #[serde(default)]
    pub note20: i64,
    #[serde(default)]
    pub note10: i64,
    #[serde(default)]
    pub coins: i64,
    #[serde(default)]
    pub coins2: i64,
    #[serde(default)]
    pub coins5: i64,
}

impl DenominationInput {
    /// Sum of count × face value across all denominations
    pub fn total(&self) -> f64 {
        let notes: i64 = [
            self.note500,
            self.note200,
            self.note100,
            self.note50,
            self.note20,
            self.note10,
        ]
        .iter()
        .zip(NOTE_VALUES)
        .map(|(count, value)| count * value)
        .sum();
        let coins = self.coins + self.coins2 * 2 + self.coins5 * 5;
        (notes + coins) as f64
    }

    /// True if any count is negative
    pub fn has_negative_count(&self) -> bool {
        [
            self.note500,
            self.note200,
            self.note100,
            self.note50,
            self.note20,
            self.note10,
            self.coins,
            self.coins2,
            self.coins5,
        ]
        .iter()
        .any(|&c| c < 0)
    }
}
