//! Common types used across the platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date range for report and expense queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range is valid when it does not run backwards
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Movement kinds recorded in the transaction log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Purchase,
    WriteOff,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "sale",
            TransactionKind::Purchase => "purchase",
            TransactionKind::WriteOff => "write_off",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sale" => Some(TransactionKind::Sale),
            "purchase" => Some(TransactionKind::Purchase),
            "write_off" => Some(TransactionKind::WriteOff),
            _ => None,
        }
    }

    /// Whether this movement consumes stock from a lot
    pub fn is_outgoing(&self) -> bool {
        matches!(self, TransactionKind::Sale | TransactionKind::WriteOff)
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed role set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    User,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::User => "user",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_inclusive_bounds() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        );
        assert!(range.is_valid());
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()));
    }

    #[test]
    fn transaction_kind_round_trip() {
        for kind in [
            TransactionKind::Sale,
            TransactionKind::Purchase,
            TransactionKind::WriteOff,
        ] {
            assert_eq!(TransactionKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(TransactionKind::from_str("expense"), None);
    }

    #[test]
    fn only_sales_and_write_offs_consume_stock() {
        assert!(TransactionKind::Sale.is_outgoing());
        assert!(TransactionKind::WriteOff.is_outgoing());
        assert!(!TransactionKind::Purchase.is_outgoing());
    }
}
