//! Spending ledger engine.
//!
//! Owner-scoped stores for categories, expenses and budgets, plus the
//! read-side reporting core: grouped spending totals (by category, by
//! month), inclusive range sums and budget evaluation. Every operation
//! takes the owner explicitly; no ambient principal exists anywhere in
//! this crate.

pub use budgets::{Budget, BudgetScope, BudgetStatus, OVERALL_LABEL};
pub use categories::Category;
pub use error::EngineError;
pub use expenses::Expense;
pub use money::Money;
pub use ops::{Engine, EngineBuilder};

pub mod budgets;
pub mod categories;
mod error;
pub mod expenses;
mod money;
mod ops;

type ResultEngine<T> = Result<T, EngineError>;
