//! Business logic services for the inventory and cost-accounting engine

pub mod auth;
pub mod category;
pub mod expense;
pub mod lot;
pub mod param;
pub mod product;
pub mod settlement;
pub mod transaction;
pub mod warehouse;

pub use auth::AuthService;
pub use category::CategoryService;
pub use expense::ExpenseService;
pub use lot::LotService;
pub use param::ParamService;
pub use product::ProductService;
pub use settlement::SettlementService;
pub use transaction::TransactionService;
pub use warehouse::WarehouseService;
