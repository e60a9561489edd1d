//! Period settlement tests
//!
//! Settlement turns the running accumulators (revenue, direct sold costs,
//! indirect costs) into VAT owed, total expense and net profit, and derives
//! the next indirect/direct ratio.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::finance::{extracted_vat, next_direct_indirect_ratio, settle_period};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_reference_settlement_case() {
        // Rev 1000 at 20% VAT with 300 direct sold and 100 indirect:
        // vat = 1000 * 0.2 / 1.2 = 166.67
        // TE  = 100 + 300 + 166.67 = 566.67
        // NP  = 1000 - 566.67 = 433.33
        let outcome = settle_period(dec("1000"), dec("0.2"), dec("300"), dec("100"));
        assert_eq!(outcome.vat_cost, dec("166.67"));
        assert_eq!(outcome.total_expense, dec("566.67"));
        assert_eq!(outcome.net_profit, dec("433.33"));
    }

    #[test]
    fn test_vat_extraction_from_inclusive_revenue() {
        // 120 gross at 20% VAT carries exactly 20 of tax
        assert_eq!(extracted_vat(dec("120"), dec("0.2")), dec("20.00"));
        assert_eq!(extracted_vat(Decimal::ZERO, dec("0.2")), Decimal::ZERO);
    }

    #[test]
    fn test_loss_period_goes_negative() {
        let outcome = settle_period(dec("100"), dec("0.2"), dec("300"), dec("50"));
        assert!(outcome.net_profit < Decimal::ZERO);
    }

    #[test]
    fn test_zero_vat_rate() {
        let outcome = settle_period(dec("1000"), Decimal::ZERO, dec("300"), dec("100"));
        assert_eq!(outcome.vat_cost, Decimal::ZERO);
        assert_eq!(outcome.total_expense, dec("400.00"));
        assert_eq!(outcome.net_profit, dec("600.00"));
    }

    #[test]
    fn test_ratio_refresh_from_rolled_accumulators() {
        assert_eq!(
            next_direct_indirect_ratio(dec("2000"), dec("5000")),
            Some(dec("0.4000"))
        );
    }

    #[test]
    fn test_ratio_unchanged_when_nothing_sold() {
        // With no sales the divisor is zero and the old ratio stays in force
        assert_eq!(next_direct_indirect_ratio(dec("2000"), Decimal::ZERO), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for accumulator amounts: 0.00 to 100000.00
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for VAT fractions: 0.00 to 0.90
    fn vat_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=90i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Net profit is always revenue minus total expense
        #[test]
        fn net_profit_balances_the_books(
            revenue in amount_strategy(),
            vat in vat_strategy(),
            direct_sold in amount_strategy(),
            indirect in amount_strategy(),
        ) {
            let outcome = settle_period(revenue, vat, direct_sold, indirect);
            prop_assert_eq!(
                outcome.net_profit,
                (revenue - outcome.total_expense).round_dp(2)
            );
        }

        /// The extracted VAT never exceeds the revenue it came out of
        #[test]
        fn vat_cost_bounded_by_revenue(
            revenue in amount_strategy(),
            vat in vat_strategy(),
        ) {
            let vat_cost = extracted_vat(revenue, vat);
            prop_assert!(vat_cost >= Decimal::ZERO);
            prop_assert!(vat_cost <= revenue);
        }

        /// Total expense includes every cost component
        #[test]
        fn total_expense_covers_components(
            revenue in amount_strategy(),
            vat in vat_strategy(),
            direct_sold in amount_strategy(),
            indirect in amount_strategy(),
        ) {
            let outcome = settle_period(revenue, vat, direct_sold, indirect);
            prop_assert!(outcome.total_expense >= direct_sold + indirect);
        }

        /// The derived ratio reproduces the division it came from
        #[test]
        fn ratio_matches_division(
            indirect in amount_strategy(),
            direct_sold in amount_strategy(),
        ) {
            match next_direct_indirect_ratio(indirect, direct_sold) {
                Some(ratio) => {
                    prop_assert_eq!(ratio, (indirect / direct_sold).round_dp(4));
                }
                None => prop_assert!(direct_sold.is_zero()),
            }
        }
    }
}
