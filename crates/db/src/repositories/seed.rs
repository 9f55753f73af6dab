//! Tenant bootstrap from a seed file.

use std::collections::HashMap;

use costline_core::actor::ActingUser;
use costline_core::tenant::TenantSchema;
use costline_core::wbs::{SeedLine, WbsError, WbsNode, WbsStatus};
use costline_shared::types::WbsNodeId;
use sea_orm::DatabaseTransaction;

use super::wbs::{find_model_by_code, insert_line};
use crate::error::StoreError;
use crate::scope::{SchemaScope, TransactionManager};

/// Loads an initial, already-approved WBS into a tenant namespace.
#[derive(Debug, Clone)]
pub struct TenantSeeder {
    tx: TransactionManager,
}

impl TenantSeeder {
    /// Creates a new seeder.
    #[must_use]
    pub const fn new(tx: TransactionManager) -> Self {
        Self { tx }
    }

    /// Seeds `lines` in order inside one transaction.
    ///
    /// A line's `parent_code` may name a line seeded earlier in the same
    /// file or one already stored. Any failure rolls back the whole file and
    /// is reported as `StoreError::Seed`.
    pub async fn seed_tenant(
        &self,
        schema: &TenantSchema,
        lines: &[SeedLine],
        acting_user: &ActingUser,
    ) -> Result<Vec<WbsNode>, StoreError> {
        let scoped = self
            .tx
            .begin(&SchemaScope::Tenant(schema.clone()))
            .await
            .map_err(|err| StoreError::Seed(Box::new(err.into())))?;
        let result = seed_internal(scoped.transaction(), lines, acting_user)
            .await
            .map_err(|err| StoreError::Seed(Box::new(err)));
        let nodes = scoped.finish(result).await?;

        tracing::info!(tenant = %schema, count = nodes.len(), "tenant seeded");
        Ok(nodes)
    }
}

async fn seed_internal(
    txn: &DatabaseTransaction,
    lines: &[SeedLine],
    acting_user: &ActingUser,
) -> Result<Vec<WbsNode>, StoreError> {
    let mut seeded: HashMap<String, WbsNodeId> = HashMap::with_capacity(lines.len());
    let mut nodes = Vec::with_capacity(lines.len());

    for (index, seed) in lines.iter().enumerate() {
        let parent_id = match &seed.parent_code {
            None => None,
            Some(code) => Some(resolve_parent(txn, &seeded, code).await?),
        };

        let line = seed.to_line(parent_id)?;
        let node = insert_line(txn, &line, WbsStatus::Approved, acting_user).await?;
        tracing::debug!(line = index + 1, code = %node.code, "seeded WBS line");

        seeded.insert(node.code.to_string(), node.id);
        nodes.push(node);
    }

    Ok(nodes)
}

async fn resolve_parent(
    txn: &DatabaseTransaction,
    seeded: &HashMap<String, WbsNodeId>,
    code: &str,
) -> Result<WbsNodeId, StoreError> {
    if let Some(id) = seeded.get(code) {
        return Ok(*id);
    }
    match find_model_by_code(txn, code).await? {
        Some(model) => Ok(model.id.into()),
        None => Err(WbsError::ParentCodeNotFound(code.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use costline_shared::AppError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

    use crate::entities::wbs_nodes;

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn seed(code: &str, parent: Option<&str>) -> SeedLine {
        SeedLine {
            code: code.to_string(),
            description: format!("Line {code}"),
            unit_cost: dec!(100),
            quantity: dec!(3),
            duration_days: None,
            parent_code: parent.map(str::to_string),
        }
    }

    fn stored(code: &str, parent_id: Option<WbsNodeId>) -> wbs_nodes::Model {
        wbs_nodes::Model {
            id: WbsNodeId::new().into_inner(),
            parent_id: parent_id.map(WbsNodeId::into_inner),
            code: code.to_string(),
            description: format!("Line {code}"),
            unit_cost: dec!(100),
            quantity: dec!(3),
            duration_days: None,
            total_cost: dec!(300),
            status: "approved".to_string(),
            created_by: Some("seeder".to_string()),
            created_at: Utc::now().into(),
        }
    }

    fn seeder(db: &DatabaseConnection) -> TenantSeeder {
        TenantSeeder::new(TransactionManager::new(
            db.clone(),
            TenantSchema::parse("public").unwrap(),
        ))
    }

    fn acme() -> TenantSchema {
        TenantSchema::parse("acme").unwrap()
    }

    fn user() -> ActingUser {
        ActingUser::new("seeder").unwrap()
    }

    #[tokio::test]
    async fn test_seeds_parent_then_child_as_approved() {
        let parent = stored("1", None);
        let child = stored("1.1", Some(parent.id.into()));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok()])
            .append_query_results([
                // "1": code check, insert
                Vec::<wbs_nodes::Model>::new(),
                vec![parent.clone()],
                // "1.1": parent check, code check, insert
                vec![parent.clone()],
                Vec::new(),
                vec![child],
            ])
            .into_connection();

        let nodes = seeder(&db)
            .seed_tenant(&acme(), &[seed("1", None), seed("1.1", Some("1"))], &user())
            .await
            .unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].parent_id, Some(nodes[0].id));
        assert!(nodes.iter().all(|n| n.status == WbsStatus::Approved));
        assert_eq!(nodes[0].total_cost, dec!(300));
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("approved"));
        assert!(log.contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_unknown_parent_code_rolls_back() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok()])
            .append_query_results([Vec::<wbs_nodes::Model>::new()])
            .into_connection();

        let err = seeder(&db)
            .seed_tenant(&acme(), &[seed("2.1", Some("2"))], &user())
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            StoreError::Seed(inner) if matches!(**inner, StoreError::Wbs(WbsError::ParentCodeNotFound(_)))
        ));
        assert!(matches!(AppError::from(err), AppError::Validation(_)));
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("ROLLBACK"));
        assert!(!log.contains("INSERT"));
    }

    #[tokio::test]
    async fn test_duplicate_code_is_integrity_failure() {
        let existing = stored("1", None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok()])
            .append_query_results([vec![existing]])
            .into_connection();

        let err = seeder(&db)
            .seed_tenant(&acme(), &[seed("1", None)], &user())
            .await
            .unwrap_err();

        assert!(matches!(AppError::from(err), AppError::IntegrityFailure(_)));
    }

    #[tokio::test]
    async fn test_invalid_line_is_rejected_before_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok()])
            .into_connection();
        let mut bad = seed("1", None);
        bad.quantity = Decimal::ZERO;

        let err = seeder(&db)
            .seed_tenant(&acme(), &[bad], &user())
            .await
            .unwrap_err();

        assert!(matches!(AppError::from(err), AppError::Validation(_)));
    }
}
