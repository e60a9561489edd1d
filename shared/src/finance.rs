//! Pure cost-accounting math
//!
//! Pricing of purchase lots and period settlement are plain decimal
//! arithmetic with no I/O, kept here so the backend services and the test
//! suites run the exact same formulas.
//!
//! Monetary results are rounded to 2 decimal places; the derived
//! indirect/direct ratio to 4.

use rust_decimal::Decimal;
use serde::Serialize;

/// Decimal places kept on monetary amounts
pub const MONEY_SCALE: u32 = 2;

/// Decimal places kept on derived rate parameters
pub const RATIO_SCALE: u32 = 4;

/// Fully-loaded unit cost: the purchase price plus an apportioned share of
/// indirect costs, taken from the previous period's indirect/direct ratio.
pub fn loaded_unit_cost(purchase_price: Decimal, direct_indirect_ratio: Decimal) -> Decimal {
    purchase_price * (Decimal::ONE + direct_indirect_ratio)
}

/// Selling price that, after VAT extraction, yields the target gross margin
/// over the fully-loaded unit cost.
///
/// Rounds up to the next whole unit, never down: underpricing a lot is worse
/// than overshooting the margin by a fraction.
pub fn selling_price(
    loaded_cost: Decimal,
    gross_margin: Decimal,
    vat: Decimal,
) -> Result<Decimal, &'static str> {
    if gross_margin < Decimal::ZERO {
        return Err("gross margin cannot be negative");
    }
    if vat < Decimal::ZERO {
        return Err("VAT rate cannot be negative");
    }
    let net_share = Decimal::ONE - vat;
    if net_share <= Decimal::ZERO {
        return Err("VAT rate must be below 100%");
    }
    Ok((loaded_cost * (Decimal::ONE + gross_margin) / net_share).ceil())
}

/// VAT contained in a VAT-inclusive revenue figure: `rev * vat / (1 + vat)`.
pub fn extracted_vat(revenue: Decimal, vat: Decimal) -> Decimal {
    (revenue * vat / (Decimal::ONE + vat)).round_dp(MONEY_SCALE)
}

/// Derived results of settling one accounting period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodOutcome {
    pub vat_cost: Decimal,
    pub total_expense: Decimal,
    pub net_profit: Decimal,
}

/// Settle a period from its accumulators.
///
/// Total expense is indirect costs plus the direct cost basis of the goods
/// actually sold plus the VAT owed on revenue; net profit is what remains of
/// revenue after that.
pub fn settle_period(
    revenue: Decimal,
    vat: Decimal,
    direct_sold_costs: Decimal,
    indirect_costs: Decimal,
) -> PeriodOutcome {
    let vat_cost = extracted_vat(revenue, vat);
    let total_expense = (indirect_costs + direct_sold_costs + vat_cost).round_dp(MONEY_SCALE);
    let net_profit = (revenue - total_expense).round_dp(MONEY_SCALE);
    PeriodOutcome {
        vat_cost,
        total_expense,
        net_profit,
    }
}

/// Indirect/direct ratio for the next period, from the rolled-forward
/// accumulators. `None` when nothing was sold, in which case the previous
/// ratio stays in force.
pub fn next_direct_indirect_ratio(
    prev_indirect_costs: Decimal,
    prev_direct_sold_costs: Decimal,
) -> Option<Decimal> {
    if prev_direct_sold_costs.is_zero() {
        return None;
    }
    Some((prev_indirect_costs / prev_direct_sold_costs).round_dp(RATIO_SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn loaded_cost_applies_ratio() {
        assert_eq!(loaded_unit_cost(dec("100"), dec("0.4")), dec("140.0"));
        assert_eq!(loaded_unit_cost(dec("50"), Decimal::ZERO), dec("50"));
    }

    #[test]
    fn selling_price_reference_case() {
        // price 100, ratio 0.4 -> loaded 140; GM 40%, VAT 20%:
        // ceil(140 * 1.4 / 0.8) = ceil(245) = 245
        let loaded = loaded_unit_cost(dec("100"), dec("0.4"));
        assert_eq!(selling_price(loaded, dec("0.4"), dec("0.2")).unwrap(), dec("245"));
    }

    #[test]
    fn selling_price_rounds_up_not_down() {
        // 100 * 1.4 / 0.8 = 175 exactly; 101 * 1.4 / 0.8 = 176.75 -> 177
        assert_eq!(selling_price(dec("100"), dec("0.4"), dec("0.2")).unwrap(), dec("175"));
        assert_eq!(selling_price(dec("101"), dec("0.4"), dec("0.2")).unwrap(), dec("177"));
    }

    #[test]
    fn selling_price_zero_vat() {
        assert_eq!(selling_price(dec("140"), dec("0.4"), Decimal::ZERO).unwrap(), dec("196"));
    }

    #[test]
    fn selling_price_rejects_bad_rates() {
        assert!(selling_price(dec("100"), dec("-0.1"), dec("0.2")).is_err());
        assert!(selling_price(dec("100"), dec("0.4"), dec("1")).is_err());
        assert!(selling_price(dec("100"), dec("0.4"), dec("-0.2")).is_err());
    }

    #[test]
    fn settlement_reference_case() {
        // Rev 1000, VAT 0.2, DirectSoldCosts 300, IndirectCosts 100:
        // vat = 1000 * 0.2 / 1.2 = 166.67, TE = 566.67, NP = 433.33
        let outcome = settle_period(dec("1000"), dec("0.2"), dec("300"), dec("100"));
        assert_eq!(outcome.vat_cost, dec("166.67"));
        assert_eq!(outcome.total_expense, dec("566.67"));
        assert_eq!(outcome.net_profit, dec("433.33"));
    }

    #[test]
    fn settlement_zero_revenue() {
        let outcome = settle_period(Decimal::ZERO, dec("0.2"), dec("300"), dec("100"));
        assert_eq!(outcome.vat_cost, Decimal::ZERO);
        assert_eq!(outcome.total_expense, dec("400.00"));
        assert_eq!(outcome.net_profit, dec("-400.00"));
    }

    #[test]
    fn ratio_rolls_forward() {
        assert_eq!(
            next_direct_indirect_ratio(dec("2000"), dec("5000")),
            Some(dec("0.4000"))
        );
        assert_eq!(next_direct_indirect_ratio(dec("2000"), Decimal::ZERO), None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn amount() -> impl Strategy<Value = Decimal> {
            (0i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2))
        }

        proptest! {
            #[test]
            fn extracted_vat_within_bounds(revenue in amount(), vat in 0i64..=90i64) {
                let vat = Decimal::new(vat, 2);
                let cost = extracted_vat(revenue, vat);
                prop_assert!(cost >= Decimal::ZERO);
                prop_assert!(cost <= revenue);
            }

            #[test]
            fn settlement_conserves_revenue(
                revenue in amount(),
                direct_sold in amount(),
                indirect in amount(),
            ) {
                let outcome = settle_period(revenue, dec("0.2"), direct_sold, indirect);
                prop_assert_eq!(outcome.net_profit + outcome.total_expense, revenue.round_dp(2));
            }
        }
    }
}
