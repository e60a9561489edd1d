//! Lot consumption tests
//!
//! In-memory model of the lot ledger: consuming stock decrements the lot
//! and the product aggregate together, refuses to oversell, and advances
//! the active-lot pointer in strict FIFO order when a lot runs dry.
//! Recording an outgoing movement bundles the log append, the consumption,
//! and the accumulator accrual into one all-or-nothing step, mirroring the
//! single database transaction the service runs.

use proptest::prelude::*;

// ============================================================================
// In-Memory Model
// ============================================================================

/// A lot as the consumption path sees it: creation order stands in for
/// `created_at`, index stands in for the id tiebreak.
#[derive(Debug, Clone, PartialEq)]
struct ModelLot {
    original: i32,
    remaining: i32,
}

#[derive(Debug, Clone, PartialEq)]
struct ModelProduct {
    total_quantity: i32,
    active_lot: Option<usize>,
    lots: Vec<ModelLot>,
    /// Quantities of the recorded outgoing movements, append order
    log: Vec<i32>,
    /// Sum accrued into the accumulators by successful recordings
    accrued: i32,
}

#[derive(Debug, PartialEq)]
enum ConsumeError {
    InsufficientStock { requested: i32, available: i32 },
    NoSuchLot,
}

#[derive(Debug, PartialEq)]
enum RecordError {
    Consume(ConsumeError),
    AccrualFailed,
}

impl ModelProduct {
    fn new() -> Self {
        Self {
            total_quantity: 0,
            active_lot: None,
            lots: Vec::new(),
            log: Vec::new(),
            accrued: 0,
        }
    }

    /// Mirror of lot creation: stock arrives, and the first lot after a dry
    /// spell becomes the active one.
    fn receive_lot(&mut self, quantity: i32) -> usize {
        let idx = self.lots.len();
        self.lots.push(ModelLot {
            original: quantity,
            remaining: quantity,
        });
        if self.total_quantity == 0 {
            self.active_lot = Some(idx);
        }
        self.total_quantity += quantity;
        idx
    }

    /// Mirror of consume: all-or-nothing decrement with FIFO advance when
    /// the lot hits exactly zero.
    fn consume(&mut self, lot_idx: usize, quantity: i32) -> Result<(), ConsumeError> {
        let lot = self.lots.get(lot_idx).ok_or(ConsumeError::NoSuchLot)?;
        if quantity > lot.remaining {
            return Err(ConsumeError::InsufficientStock {
                requested: quantity,
                available: lot.remaining,
            });
        }

        self.lots[lot_idx].remaining -= quantity;
        self.total_quantity -= quantity;

        if self.lots[lot_idx].remaining == 0 {
            self.advance_active_lot();
        }

        Ok(())
    }

    /// Oldest lot that still holds stock, or None when all are exhausted
    fn advance_active_lot(&mut self) {
        self.active_lot = self.lots.iter().position(|l| l.remaining > 0);
    }

    /// Mirror of recording an outgoing movement: append the log row first,
    /// then consume, then accrue. Any failing step rolls the whole step
    /// back, the way the enclosing database transaction would.
    fn record_outgoing(
        &mut self,
        lot_idx: usize,
        quantity: i32,
        accrual_ok: bool,
    ) -> Result<(), RecordError> {
        let before = self.clone();

        self.log.push(quantity);
        if let Err(e) = self.consume(lot_idx, quantity) {
            *self = before;
            return Err(RecordError::Consume(e));
        }
        if !accrual_ok {
            *self = before;
            return Err(RecordError::AccrualFailed);
        }
        self.accrued += quantity;
        Ok(())
    }

    fn lot_sum(&self) -> i32 {
        self.lots.iter().map(|l| l.remaining).sum()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_first_lot_becomes_active() {
        let mut product = ModelProduct::new();
        let idx = product.receive_lot(10);
        assert_eq!(product.active_lot, Some(idx));
        assert_eq!(product.total_quantity, 10);
    }

    #[test]
    fn test_second_lot_does_not_steal_pointer() {
        let mut product = ModelProduct::new();
        let first = product.receive_lot(10);
        product.receive_lot(20);
        assert_eq!(product.active_lot, Some(first));
    }

    #[test]
    fn test_exhausting_a_lot_advances_fifo() {
        let mut product = ModelProduct::new();
        let first = product.receive_lot(5);
        let second = product.receive_lot(8);

        product.consume(first, 5).unwrap();
        assert_eq!(product.active_lot, Some(second));
        assert_eq!(product.total_quantity, 8);
    }

    #[test]
    fn test_pointer_goes_none_when_all_exhausted() {
        let mut product = ModelProduct::new();
        let first = product.receive_lot(5);
        product.consume(first, 5).unwrap();
        assert_eq!(product.active_lot, None);
        assert_eq!(product.total_quantity, 0);
    }

    #[test]
    fn test_restock_after_dry_spell_reactivates() {
        let mut product = ModelProduct::new();
        let first = product.receive_lot(3);
        product.consume(first, 3).unwrap();

        let fresh = product.receive_lot(7);
        assert_eq!(product.active_lot, Some(fresh));
    }

    #[test]
    fn test_oversell_is_rejected_and_state_unchanged() {
        let mut product = ModelProduct::new();
        let first = product.receive_lot(5);
        let before = product.clone();

        let err = product.consume(first, 6).unwrap_err();
        assert_eq!(
            err,
            ConsumeError::InsufficientStock {
                requested: 6,
                available: 5
            }
        );
        assert_eq!(product, before);
    }

    #[test]
    fn test_partial_consumption_keeps_pointer() {
        let mut product = ModelProduct::new();
        let first = product.receive_lot(10);
        product.receive_lot(10);

        product.consume(first, 4).unwrap();
        assert_eq!(product.active_lot, Some(first));
        assert_eq!(product.lots[first].remaining, 6);
    }

    #[test]
    fn test_record_persists_log_and_accrual_together() {
        let mut product = ModelProduct::new();
        let first = product.receive_lot(10);

        product.record_outgoing(first, 4, true).unwrap();
        assert_eq!(product.log, vec![4]);
        assert_eq!(product.accrued, 4);
        assert_eq!(product.lots[first].remaining, 6);
        assert_eq!(product.total_quantity, 6);
    }

    #[test]
    fn test_failed_accrual_rolls_back_log_and_quantities() {
        let mut product = ModelProduct::new();
        let first = product.receive_lot(10);
        let before = product.clone();

        let err = product.record_outgoing(first, 4, false).unwrap_err();
        assert_eq!(err, RecordError::AccrualFailed);
        // No orphaned log row, no partial decrement
        assert_eq!(product, before);
        assert!(product.log.is_empty());
    }

    #[test]
    fn test_oversell_rolls_back_the_log_append() {
        let mut product = ModelProduct::new();
        let first = product.receive_lot(5);
        let before = product.clone();

        let err = product.record_outgoing(first, 6, true).unwrap_err();
        assert_eq!(
            err,
            RecordError::Consume(ConsumeError::InsufficientStock {
                requested: 6,
                available: 5
            })
        );
        assert_eq!(product, before);
    }

    #[test]
    fn test_fifo_skips_exhausted_middle_lot() {
        let mut product = ModelProduct::new();
        let a = product.receive_lot(2);
        let b = product.receive_lot(3);
        let c = product.receive_lot(4);

        // Drain the middle lot out of order, then the head
        product.consume(b, 3).unwrap();
        product.consume(a, 2).unwrap();
        assert_eq!(product.active_lot, Some(c));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// A batch of incoming lot sizes followed by arbitrary consume attempts
    fn scenario_strategy() -> impl Strategy<Value = (Vec<i32>, Vec<(usize, i32)>)> {
        (
            prop::collection::vec(1i32..=50, 1..6),
            prop::collection::vec((0usize..6, 1i32..=60), 0..20),
        )
    }

    /// Like `scenario_strategy`, but each attempt also carries whether its
    /// accrual step succeeds
    fn record_strategy() -> impl Strategy<Value = (Vec<i32>, Vec<(usize, i32, bool)>)> {
        (
            prop::collection::vec(1i32..=50, 1..6),
            prop::collection::vec((0usize..6, 1i32..=60, any::<bool>()), 0..20),
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The product aggregate always equals the sum over its lots
        #[test]
        fn total_matches_lot_sum((sizes, consumes) in scenario_strategy()) {
            let mut product = ModelProduct::new();
            for size in &sizes {
                product.receive_lot(*size);
            }
            for (idx, qty) in consumes {
                let _ = product.consume(idx, qty);
                prop_assert_eq!(product.total_quantity, product.lot_sum());
            }
        }

        /// No sequence of operations drives any quantity negative
        #[test]
        fn quantities_never_negative((sizes, consumes) in scenario_strategy()) {
            let mut product = ModelProduct::new();
            for size in &sizes {
                product.receive_lot(*size);
            }
            for (idx, qty) in consumes {
                let _ = product.consume(idx, qty);
            }
            prop_assert!(product.total_quantity >= 0);
            prop_assert!(product.lots.iter().all(|l| l.remaining >= 0));
            prop_assert!(product.lots.iter().all(|l| l.remaining <= l.original));
        }

        /// The active pointer is the oldest lot with stock, or None
        #[test]
        fn pointer_always_fifo_consistent((sizes, consumes) in scenario_strategy()) {
            let mut product = ModelProduct::new();
            for size in &sizes {
                product.receive_lot(*size);
            }
            for (idx, qty) in consumes {
                let _ = product.consume(idx, qty);
            }
            let expected = product.lots.iter().position(|l| l.remaining > 0);
            if product.total_quantity == 0 {
                prop_assert_eq!(product.active_lot, None);
            } else if product.active_lot != expected {
                // The pointer only moves when a consumed lot hits zero, so a
                // partially drained older lot may sit behind it; it must
                // still point at a lot with stock.
                let idx = product.active_lot.unwrap();
                prop_assert!(product.lots[idx].remaining > 0);
            }
        }

        /// Every recorded movement either fully lands (log row, decrement,
        /// accrual) or leaves no trace at all
        #[test]
        fn recording_is_all_or_nothing((sizes, attempts) in record_strategy()) {
            let mut product = ModelProduct::new();
            let mut received = 0;
            for size in &sizes {
                product.receive_lot(*size);
                received += *size;
            }
            for (idx, qty, accrual_ok) in attempts {
                let _ = product.record_outgoing(idx, qty, accrual_ok);
                // The log and the accumulators never drift apart
                prop_assert_eq!(product.accrued, product.log.iter().sum::<i32>());
                // Stock leaves the lots exactly as fast as it accrues
                prop_assert_eq!(product.lot_sum() + product.accrued, received);
            }
        }

        /// A rejected consume leaves the model byte-for-byte unchanged
        #[test]
        fn failed_consume_is_a_noop((sizes, _) in scenario_strategy(), qty in 51i32..=100) {
            let mut product = ModelProduct::new();
            for size in &sizes {
                product.receive_lot(*size);
            }
            let before = product.clone();
            // Every lot holds at most 50, so this always oversells
            let result = product.consume(0, qty);
            prop_assert!(result.is_err());
            prop_assert_eq!(product, before);
        }
    }
}
