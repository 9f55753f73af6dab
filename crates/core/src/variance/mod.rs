//! Real-time variance classification of new expenses.
//!
//! An expense is judged once, when it is recorded, against its own budget
//! line and against the top-level category the line belongs to. Flags are
//! never recomputed afterwards.

pub mod classifier;
pub mod flag;
pub mod policy;


pub use classifier::{CategoryTotals, VarianceClassifier};
pub use flag::VarianceFlag;
pub use policy::VariancePolicy;
