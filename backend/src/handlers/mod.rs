//! HTTP handlers for the StockLedger API

pub mod auth;
pub mod category;
pub mod expense;
pub mod health;
pub mod lot;
pub mod param;
pub mod product;
pub mod settlement;
pub mod transaction;
pub mod warehouse;

pub use auth::*;
pub use category::*;
pub use expense::*;
pub use health::*;
pub use lot::*;
pub use param::*;
pub use product::*;
pub use settlement::*;
pub use transaction::*;
pub use warehouse::*;
