//! Balance calculator
//!
//! Pure, side-effect-free folds over a register's transaction ledger,
//! using `rust_decimal` so that repeated small amounts accumulate exactly.
//! All amounts enter as `f64` (storage format) and leave as `f64` rounded
//! to 2 decimal places, half-up.
//!
//! Direction is carried by `TxType` and addition is commutative, so every
//! fold here is order-independent over the transaction set.

use rust_decimal::prelude::*;
use shared::models::{BalanceBreakdown, CashTransaction, PaymentMethod, TxType};

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Reconciliation bucket for a payment method
///
/// Debit and credit cards cannot be counted separately at the drawer, so
/// they fold into one card bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodBucket {
    Cash,
    Upi,
    Card,
}

impl MethodBucket {
    pub fn matches(self, method: PaymentMethod) -> bool {
        match self {
            MethodBucket::Cash => method == PaymentMethod::Cash,
            MethodBucket::Upi => method == PaymentMethod::Upi,
            MethodBucket::Card => {
                method == PaymentMethod::Debit || method == PaymentMethod::Credit
            }
        }
    }
}

/// Signed contribution of one ledger entry
fn signed(tx: &CashTransaction) -> Decimal {
    let amount = to_decimal(tx.amount);
    match tx.tx_type {
        TxType::CashIn => amount,
        TxType::CashOut => -amount,
    }
}

/// opening + Σ(CASH_IN) − Σ(CASH_OUT) over all payment methods
pub fn current_balance(opening: f64, transactions: &[CashTransaction]) -> f64 {
    let total = transactions
        .iter()
        .fold(to_decimal(opening), |acc, tx| acc + signed(tx));
    to_f64(total)
}

/// Same fold restricted to one reconciliation bucket
pub fn balance_by_method(
    opening: f64,
    transactions: &[CashTransaction],
    bucket: MethodBucket,
) -> f64 {
    let total = transactions
        .iter()
        .filter(|tx| bucket.matches(tx.payment_method))
        .fold(to_decimal(opening), |acc, tx| acc + signed(tx));
    to_f64(total)
}

/// Ledger-derived balances per bucket.
///
/// Seeded with zero: the opening float is itself a ledger row (the seed
/// CASH_IN written at open), so seeding with the register's opening fields
/// would count it twice. Σ(ledger) therefore always equals the register's
/// recorded closing state, corrections included.
pub fn expected_balances(transactions: &[CashTransaction]) -> BalanceBreakdown {
    let cash = balance_by_method(0.0, transactions, MethodBucket::Cash);
    let upi = balance_by_method(0.0, transactions, MethodBucket::Upi);
    let card = balance_by_method(0.0, transactions, MethodBucket::Card);
    BalanceBreakdown {
        total: to_f64(to_decimal(cash) + to_decimal(upi) + to_decimal(card)),
        cash,
        upi,
        card,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::TxSource;

    fn tx(tx_type: TxType, amount: f64, method: PaymentMethod) -> CashTransaction {
        CashTransaction {
            id: shared::util::snowflake_id(),
            register_id: 1,
            tx_type,
            amount,
            payment_method: method,
            source: TxSource::Order,
            description: None,
            performed_by: 1,
            created_at: shared::util::now_millis(),
        }
    }

    #[test]
    fn decimal_beats_f64_accumulation() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);
        assert_eq!(to_f64(to_decimal(0.1) + to_decimal(0.2)), 0.3);
    }

    #[test]
    fn current_balance_folds_in_and_out() {
        let txs = vec![
            tx(TxType::CashIn, 1000.0, PaymentMethod::Cash),
            tx(TxType::CashIn, 500.0, PaymentMethod::Cash),
            tx(TxType::CashOut, 200.0, PaymentMethod::Cash),
        ];
        assert_eq!(current_balance(0.0, &txs), 1300.0);
        assert_eq!(current_balance(50.0, &txs), 1350.0);
    }

    #[test]
    fn balance_by_method_filters_buckets() {
        let txs = vec![
            tx(TxType::CashIn, 1000.0, PaymentMethod::Cash),
            tx(TxType::CashIn, 500.0, PaymentMethod::Cash),
            tx(TxType::CashOut, 200.0, PaymentMethod::Cash),
            tx(TxType::CashIn, 350.0, PaymentMethod::Upi),
            tx(TxType::CashIn, 120.0, PaymentMethod::Debit),
            tx(TxType::CashIn, 80.0, PaymentMethod::Credit),
        ];
        assert_eq!(balance_by_method(0.0, &txs, MethodBucket::Cash), 1300.0);
        assert_eq!(balance_by_method(0.0, &txs, MethodBucket::Upi), 350.0);
        // Debit and credit fold into one card bucket
        assert_eq!(balance_by_method(0.0, &txs, MethodBucket::Card), 200.0);

        let expected = expected_balances(&txs);
        assert_eq!(expected.total, 1850.0);
        assert_eq!(expected.cash, 1300.0);
    }

    #[test]
    fn fold_is_order_independent() {
        let mut txs = vec![
            tx(TxType::CashIn, 1000.0, PaymentMethod::Cash),
            tx(TxType::CashOut, 33.33, PaymentMethod::Cash),
            tx(TxType::CashIn, 0.01, PaymentMethod::Upi),
            tx(TxType::CashIn, 250.5, PaymentMethod::Debit),
            tx(TxType::CashOut, 99.99, PaymentMethod::Credit),
            tx(TxType::CashIn, 42.0, PaymentMethod::Cash),
        ];
        let baseline = current_balance(500.0, &txs);
        let baseline_expected = expected_balances(&txs);

        // Every rotation plus a reversal; commutativity makes them all equal
        for _ in 0..txs.len() {
            txs.rotate_left(1);
            assert_eq!(current_balance(500.0, &txs), baseline);
            assert_eq!(expected_balances(&txs), baseline_expected);
        }
        txs.reverse();
        assert_eq!(current_balance(500.0, &txs), baseline);
        assert_eq!(expected_balances(&txs), baseline_expected);
    }

    #[test]
    fn repeated_small_amounts_accumulate_exactly() {
        let txs: Vec<_> = (0..1000)
            .map(|_| tx(TxType::CashIn, 0.01, PaymentMethod::Cash))
            .collect();
        assert_eq!(current_balance(0.0, &txs), 10.0);
    }

    #[test]
    fn empty_ledger_returns_opening() {
        assert_eq!(current_balance(750.25, &[]), 750.25);
        assert_eq!(expected_balances(&[]), BalanceBreakdown::default());
    }
}
