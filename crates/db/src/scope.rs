//! Schema-scoped transactions.
//!
//! Every unit of work runs in one transaction whose `search_path` is bound
//! with `SET LOCAL`, so the binding ends with the transaction and never leaks
//! into the pooled connection.
//!
//! # Usage
//!
//! ```ignore
//! let scope = SchemaScope::tenant("acme")?;
//! let scoped = manager.begin(&scope).await?;
//! let result = do_work(scoped.transaction()).await;
//! scoped.finish(result).await
//! ```

use std::fmt;
use std::time::Duration;

use costline_core::tenant::{TenantError, TenantSchema};
use costline_shared::{AppConfig, DatabaseConfig};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbErr,
    TransactionTrait,
};

use crate::error::StoreError;

/// Namespace selection for one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaScope {
    /// A tenant's isolated namespace, with the shared namespace as fallback.
    Tenant(TenantSchema),
    /// The shared namespace only (tenant registry, category master data).
    Shared,
}

impl SchemaScope {
    /// Validates a raw tenant identifier.
    ///
    /// # Errors
    ///
    /// Returns `TenantError::InvalidSchemaName` for anything outside `[a-z0-9_]`.
    pub fn tenant(raw: &str) -> Result<Self, TenantError> {
        TenantSchema::parse(raw).map(Self::Tenant)
    }
}

impl fmt::Display for SchemaScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tenant(schema) => write!(f, "{schema}"),
            Self::Shared => f.write_str("shared"),
        }
    }
}

/// A transaction bound to one namespace.
pub struct ScopedTransaction {
    txn: DatabaseTransaction,
    scope: String,
}

impl ScopedTransaction {
    /// Returns the underlying transaction for executing queries.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await?;
        tracing::debug!(scope = %self.scope, "transaction committed");
        Ok(())
    }

    /// Rolls back the transaction.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }

    /// Commits on `Ok`, rolls back on `Err`, and returns the outcome.
    ///
    /// A rollback failure is logged; the original error is still returned.
    pub async fn finish<T>(self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(err) => {
                let scope = self.scope.clone();
                tracing::warn!(%scope, error = %err, "rolling back transaction");
                if let Err(rollback_err) = self.rollback().await {
                    tracing::error!(%scope, error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

/// Opens schema-scoped transactions on a pooled connection.
#[derive(Debug, Clone)]
pub struct TransactionManager {
    db: DatabaseConnection,
    shared: TenantSchema,
    statement_timeout_ms: u64,
}

impl TransactionManager {
    /// Creates a manager with the given shared namespace and no statement timeout.
    #[must_use]
    pub fn new(db: DatabaseConnection, shared: TenantSchema) -> Self {
        Self {
            db,
            shared,
            statement_timeout_ms: 0,
        }
    }

    /// Creates a manager from application configuration.
    ///
    /// # Errors
    ///
    /// Returns `TenantError::InvalidSchemaName` if the configured shared
    /// namespace is not a safe identifier.
    pub fn from_config(db: DatabaseConnection, config: &AppConfig) -> Result<Self, TenantError> {
        let shared = TenantSchema::parse(&config.tenancy.shared_schema)?;
        Ok(Self::new(db, shared).with_statement_timeout(config.database.statement_timeout_ms))
    }

    /// Applies `SET LOCAL statement_timeout` to every transaction. Zero disables it.
    #[must_use]
    pub fn with_statement_timeout(mut self, millis: u64) -> Self {
        self.statement_timeout_ms = millis;
        self
    }

    /// The pooled connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// The shared namespace.
    #[must_use]
    pub fn shared_schema(&self) -> &TenantSchema {
        &self.shared
    }

    /// Begins a transaction and binds it to `scope`.
    pub async fn begin(&self, scope: &SchemaScope) -> Result<ScopedTransaction, DbErr> {
        let txn = self.db.begin().await?;

        txn.execute_unprepared(&self.search_path_sql(scope)).await?;
        if self.statement_timeout_ms > 0 {
            let sql = format!("SET LOCAL statement_timeout = {}", self.statement_timeout_ms);
            txn.execute_unprepared(&sql).await?;
        }

        tracing::debug!(%scope, "transaction started");
        Ok(ScopedTransaction {
            txn,
            scope: scope.to_string(),
        })
    }

    /// Begins a transaction in a tenant namespace given as a raw identifier.
    ///
    /// The identifier is validated before any statement is sent.
    pub async fn begin_tenant(&self, raw: &str) -> Result<ScopedTransaction, StoreError> {
        let scope = SchemaScope::tenant(raw).inspect_err(|err| {
            tracing::warn!(error = %err, "rejected tenant identifier");
        })?;
        Ok(self.begin(&scope).await?)
    }

    /// Begins a transaction in the shared namespace.
    pub async fn begin_shared(&self) -> Result<ScopedTransaction, DbErr> {
        self.begin(&SchemaScope::Shared).await
    }

    fn search_path_sql(&self, scope: &SchemaScope) -> String {
        match scope {
            SchemaScope::Tenant(schema) => format!(
                "SET LOCAL search_path TO {}, {}",
                schema.quoted(),
                self.shared.quoted()
            ),
            SchemaScope::Shared => format!("SET LOCAL search_path TO {}", self.shared.quoted()),
        }
    }
}

/// Opens the connection pool.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .sqlx_logging(false);

    Database::connect(options).await
}
