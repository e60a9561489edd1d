//! Period settlement service
//!
//! Consumes the accumulators the transaction and expense paths have been
//! feeding, derives net profit and total expense for the period, and rolls
//! the previous-period figures forward for the next pricing cycle.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::param;
use shared::finance;
use shared::params;

/// Settlement over the parameter store
#[derive(Clone)]
pub struct SettlementService {
    db: PgPool,
}

/// Result of settling one period
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSettlement {
    pub revenue: Decimal,
    pub direct_sold_costs: Decimal,
    pub indirect_costs: Decimal,
    pub vat_cost: Decimal,
    pub total_expense: Decimal,
    pub net_profit: Decimal,
}

impl SettlementService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Settle the current period.
    ///
    /// Reads Rev, VAT, DirectSoldCosts and IndirectCosts in one locked
    /// statement (failing with `MissingParameter` when any is absent or
    /// uninitialized) so the figures all come from the same snapshot and
    /// concurrent accruals wait for the settlement to commit. Writes NP and
    /// TE, rolls prevIndirectCosts/prevDirectSoldCosts forward, and
    /// refreshes DirectIndirectRatio when anything was sold.
    ///
    /// The accumulators themselves are NOT zeroed: calling this twice
    /// without an external reset settles the same figures twice. The reset
    /// policy belongs to the caller.
    pub async fn settle_period(&self) -> AppResult<PeriodSettlement> {
        let mut tx = self.db.begin().await?;

        let values = param::read_required_many(
            &mut tx,
            &[
                params::REVENUE,
                params::VAT,
                params::DIRECT_SOLD_COSTS,
                params::INDIRECT_COSTS,
            ],
        )
        .await?;
        let (revenue, vat, direct_sold_costs, indirect_costs) =
            (values[0], values[1], values[2], values[3]);

        let outcome = finance::settle_period(revenue, vat, direct_sold_costs, indirect_costs);

        param::write_value_in_tx(&mut tx, params::NET_PROFIT, outcome.net_profit).await?;
        param::write_value_in_tx(&mut tx, params::TOTAL_EXPENSE, outcome.total_expense).await?;
        param::write_value_in_tx(&mut tx, params::PREV_INDIRECT_COSTS, indirect_costs).await?;
        param::write_value_in_tx(&mut tx, params::PREV_DIRECT_SOLD_COSTS, direct_sold_costs)
            .await?;

        if let Some(ratio) =
            finance::next_direct_indirect_ratio(indirect_costs, direct_sold_costs)
        {
            param::write_value_in_tx(&mut tx, params::DIRECT_INDIRECT_RATIO, ratio).await?;
        }

        tx.commit().await?;

        tracing::info!(
            revenue = %revenue,
            net_profit = %outcome.net_profit,
            total_expense = %outcome.total_expense,
            "period settled"
        );

        Ok(PeriodSettlement {
            revenue,
            direct_sold_costs,
            indirect_costs,
            vat_cost: outcome.vat_cost,
            total_expense: outcome.total_expense,
            net_profit: outcome.net_profit,
        })
    }
}
