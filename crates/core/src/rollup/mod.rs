//! Hierarchical budget and spend aggregation.

pub mod engine;
pub mod types;
pub mod window;


pub use engine::RollupEngine;
pub use types::{RollupNode, RollupRow, SelfTotals};
pub use window::{DateWindow, InvalidDateWindow};
