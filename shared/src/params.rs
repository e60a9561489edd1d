//! Well-known accounting parameter keys
//!
//! The parameter store is a keyed table of running totals and rates. A fixed
//! set of keys drives pricing, transaction accrual, and period settlement.
//! Rates (VAT, GM, DirectIndirectRatio) are stored as fractions, so 20% VAT
//! is `0.2`.

/// VAT rate as a fraction of the net price
pub const VAT: &str = "VAT";

/// Desired gross margin over fully-loaded cost, as a fraction
pub const GROSS_MARGIN: &str = "GM";

/// Revenue accumulated in the current period (VAT-inclusive)
pub const REVENUE: &str = "Rev";

/// Net profit of the last settled period
pub const NET_PROFIT: &str = "NP";

/// Total expense of the last settled period
pub const TOTAL_EXPENSE: &str = "TE";

/// Indirect costs accumulated in the current period (expenses, write-offs)
pub const INDIRECT_COSTS: &str = "IndirectCosts";

/// Direct costs accumulated in the current period (purchases)
pub const DIRECT_COSTS: &str = "DirectCosts";

/// Direct cost basis of goods sold in the current period
pub const DIRECT_SOLD_COSTS: &str = "DirectSoldCosts";

/// Indirect-to-direct-sold cost ratio of the previous period, used to
/// apportion indirect costs into the loaded unit cost of new lots
pub const DIRECT_INDIRECT_RATIO: &str = "DirectIndirectRatio";

/// Indirect costs of the previous period, rolled forward by settlement
pub const PREV_INDIRECT_COSTS: &str = "prevIndirectCosts";

/// Direct sold costs of the previous period, rolled forward by settlement
pub const PREV_DIRECT_SOLD_COSTS: &str = "prevDirectSoldCosts";

/// Keys a fresh installation is expected to seed
pub fn seed_keys() -> &'static [&'static str] {
    &[
        VAT,
        GROSS_MARGIN,
        REVENUE,
        NET_PROFIT,
        TOTAL_EXPENSE,
        INDIRECT_COSTS,
        DIRECT_COSTS,
        DIRECT_SOLD_COSTS,
        DIRECT_INDIRECT_RATIO,
        PREV_INDIRECT_COSTS,
        PREV_DIRECT_SOLD_COSTS,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_keys_are_distinct() {
        let keys = seed_keys();
        assert_eq!(keys.len(), 11);
        for (i, key) in keys.iter().enumerate() {
            assert!(!keys[i + 1..].contains(key), "duplicate key {}", key);
        }
    }
}
