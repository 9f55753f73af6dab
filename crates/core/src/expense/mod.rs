//! Expense entries recorded against budget lines.

pub mod error;
pub mod types;

pub use error::ExpenseError;
pub use types::{ExpenseEntry, NewExpense};
