//! Lot pricing tests
//!
//! Selling prices are derived from the purchase price, the indirect/direct
//! cost ratio, the target gross margin, and the VAT rate, and always round
//! up to the next whole unit.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::finance::{loaded_unit_cost, selling_price};

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
    fn test_reference_pricing_case() {
        // Purchase at 100 with a 0.4 cost ratio loads to 140; with 40%
        // margin and 20% VAT the shelf price is 140 * 1.4 / 0.8 = 245.
        let loaded = loaded_unit_cost(dec("100"), dec("0.4"));
        assert_eq!(loaded, dec("140"));

        let price = selling_price(loaded, dec("0.4"), dec("0.2")).unwrap();
        assert_eq!(price, dec("245"));
    }

    #[test]
    fn test_zero_ratio_means_no_loading() {
        assert_eq!(loaded_unit_cost(dec("80"), Decimal::ZERO), dec("80"));
    }

    #[test]
    fn test_fractional_result_rounds_up() {
        // 33 * 1.4 / 0.8 = 57.75, which must land on 58, never 57
        let price = selling_price(dec("33"), dec("0.4"), dec("0.2")).unwrap();
        assert_eq!(price, dec("58"));
    }

    #[test]
    fn test_exact_result_not_inflated() {
        // 100 * 1.4 / 0.8 = 175 exactly; no extra unit added
        let price = selling_price(dec("100"), dec("0.4"), dec("0.2")).unwrap();
        assert_eq!(price, dec("175"));
    }

    #[test]
    fn test_vat_at_or_above_one_rejected() {
        assert!(selling_price(dec("100"), dec("0.4"), dec("1")).is_err());
        assert!(selling_price(dec("100"), dec("0.4"), dec("1.5")).is_err());
    }

    #[test]
    fn test_negative_rates_rejected() {
        assert!(selling_price(dec("100"), dec("-0.1"), dec("0.2")).is_err());
        assert!(selling_price(dec("100"), dec("0.4"), dec("-0.2")).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for purchase prices: 0.01 to 10000.00
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for rate fractions: 0.00 to 0.90
    fn fraction_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=90i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The shelf price never drops below the fully-loaded cost
        #[test]
        fn selling_price_covers_loaded_cost(
            price in price_strategy(),
            ratio in fraction_strategy(),
            gm in fraction_strategy(),
            vat in fraction_strategy(),
        ) {
            let loaded = loaded_unit_cost(price, ratio);
            let selling = selling_price(loaded, gm, vat).unwrap();
            prop_assert!(selling >= loaded);
        }

        /// Prices are whole units
        #[test]
        fn selling_price_is_integral(
            price in price_strategy(),
            gm in fraction_strategy(),
            vat in fraction_strategy(),
        ) {
            let selling = selling_price(price, gm, vat).unwrap();
            prop_assert_eq!(selling, selling.floor());
        }

        /// A higher margin never produces a cheaper price
        #[test]
        fn selling_price_monotone_in_margin(
            price in price_strategy(),
            gm in fraction_strategy(),
            vat in fraction_strategy(),
        ) {
            let lower = selling_price(price, gm, vat).unwrap();
            let higher = selling_price(price, gm + dec("0.05"), vat).unwrap();
            prop_assert!(higher >= lower);
        }

        /// A higher VAT rate never produces a cheaper price
        #[test]
        fn selling_price_monotone_in_vat(
            price in price_strategy(),
            gm in fraction_strategy(),
            vat in fraction_strategy(),
        ) {
            let lower = selling_price(price, gm, vat).unwrap();
            let higher = selling_price(price, gm, vat + dec("0.05")).unwrap();
            prop_assert!(higher >= lower);
        }
    }
}
