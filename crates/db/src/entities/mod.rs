//! `SeaORM` entities.
//!
//! Table names are unqualified. The active `search_path`, set per
//! transaction, decides which namespace they resolve in.

pub mod expense_entries;
pub mod tenants;
pub mod wbs_categories;
pub mod wbs_nodes;
