//! Shared types and logic for the StockLedger platform
//!
//! This crate contains the domain vocabulary shared between the backend
//! services and their test suites: accounting parameter keys, the pure
//! pricing/settlement math, common types, and input validation helpers.

pub mod finance;
pub mod params;
pub mod types;
pub mod validation;

pub use finance::*;
pub use params::*;
pub use types::*;
pub use validation::*;
