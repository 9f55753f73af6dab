//! Schema-scoped persistence for Costline.
//!
//! This crate provides:
//! - `SeaORM` entity definitions with unqualified table names
//! - [`TransactionManager`], which binds every unit of work to one tenant
//!   namespace (plus the shared namespace) for the lifetime of a transaction
//! - Repositories for the WBS tree, the expense ledger, rollup reads, the
//!   tenant registry, category master data and tenant seeding
//!
//! Creating namespaces and tables is left to provisioning.

pub mod entities;
pub mod error;
pub mod repositories;
pub mod scope;

pub use error::StoreError;
pub use repositories::{
    CategoryRepository, ExpenseLedger, RollupReader, SchemaResolver, TenantRegistry,
    TenantSeeder, WbsRepository,
};
pub use scope::{SchemaScope, ScopedTransaction, TransactionManager, connect};
