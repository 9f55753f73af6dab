//! Core business logic for Costline.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `actor` - The authenticated user performing a write
//! - `amount` - Storage precision for money and quantities
//! - `tenant` - Tenant schema identifiers and registration input
//! - `wbs` - WBS codes, budget lines, and the draft approval state machine
//! - `expense` - Expense entry value objects
//! - `variance` - Real-time variance classification
//! - `rollup` - Hierarchical budget/spend aggregation
//! - `category` - WBS category master data

pub mod actor;
pub mod amount;
pub mod category;
pub mod expense;
pub mod rollup;
pub mod tenant;
pub mod variance;
pub mod wbs;
