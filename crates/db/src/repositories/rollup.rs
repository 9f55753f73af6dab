//! Rollup report reader.

use std::collections::HashMap;

use costline_core::rollup::{DateWindow, RollupEngine, RollupNode, RollupRow, SelfTotals};
use costline_core::tenant::TenantSchema;
use costline_shared::types::WbsNodeId;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
};
use uuid::Uuid;

use crate::entities::{expense_entries, wbs_nodes};
use crate::error::StoreError;
use crate::scope::{SchemaScope, TransactionManager};

#[derive(Debug, FromQueryResult)]
struct NodeSums {
    wbs_id: Uuid,
    paid: Option<Decimal>,
    committed: Option<Decimal>,
}

/// Reads the tree and per-line expense sums, then rolls them up.
#[derive(Debug, Clone)]
pub struct RollupReader {
    tx: TransactionManager,
}

impl RollupReader {
    /// Creates a new rollup reader.
    #[must_use]
    pub const fn new(tx: TransactionManager) -> Self {
        Self { tx }
    }

    /// One row per line in natural code order.
    ///
    /// With a window, only expenses dated inside it count. Budgets are never
    /// filtered.
    pub async fn rollup(
        &self,
        schema: &TenantSchema,
        window: Option<DateWindow>,
    ) -> Result<Vec<RollupRow>, StoreError> {
        let scoped = self.tx.begin(&SchemaScope::Tenant(schema.clone())).await?;
        let result = read_inputs(scoped.transaction(), window).await;
        let (nodes, totals) = scoped.finish(result).await?;

        tracing::debug!(tenant = %schema, nodes = nodes.len(), "computing rollup");
        Ok(RollupEngine::roll_up(&nodes, &totals))
    }
}

async fn read_inputs(
    txn: &DatabaseTransaction,
    window: Option<DateWindow>,
) -> Result<(Vec<RollupNode>, HashMap<WbsNodeId, SelfTotals>), StoreError> {
    let nodes = wbs_nodes::Entity::find()
        .all(txn)
        .await?
        .into_iter()
        .map(|model| RollupNode {
            id: model.id.into(),
            parent_id: model.parent_id.map(Into::into),
            code: model.code,
            description: model.description,
            total_cost: model.total_cost,
        })
        .collect();

    let mut sums = expense_entries::Entity::find()
        .select_only()
        .column(expense_entries::Column::WbsId)
        .column_as(expense_entries::Column::PaidAmount.sum(), "paid")
        .column_as(expense_entries::Column::CommitmentAmount.sum(), "committed")
        .group_by(expense_entries::Column::WbsId);
    if let Some(window) = window {
        sums = sums.filter(
            expense_entries::Column::ExpenseDate.between(window.start(), window.end()),
        );
    }

    let totals = sums
        .into_model::<NodeSums>()
        .all(txn)
        .await?
        .into_iter()
        .map(|row| {
            (
                row.wbs_id.into(),
                SelfTotals {
                    paid: row.paid.unwrap_or_default(),
                    committed: row.committed.unwrap_or_default(),
                },
            )
        })
        .collect();

    Ok((nodes, totals))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn node(code: &str, parent: Option<Uuid>, total_cost: Decimal) -> wbs_nodes::Model {
        wbs_nodes::Model {
            id: WbsNodeId::new().into_inner(),
            parent_id: parent,
            code: code.to_string(),
            description: format!("Line {code}"),
            unit_cost: total_cost,
            quantity: Decimal::ONE,
            duration_days: None,
            total_cost,
            status: "approved".to_string(),
            created_by: None,
            created_at: Utc::now().into(),
        }
    }

    fn sums(wbs_id: Uuid, paid: Decimal, committed: Decimal) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("wbs_id", Value::from(wbs_id)),
            ("paid", Value::from(Some(paid))),
            ("committed", Value::from(Some(committed))),
        ])
    }

    fn reader(db: &sea_orm::DatabaseConnection) -> RollupReader {
        RollupReader::new(TransactionManager::new(
            db.clone(),
            TenantSchema::parse("public").unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_rollup_reads_tree_and_sums() {
        let root = node("1.0", None, dec!(2000));
        let child = node("1.1", Some(root.id), dec!(500));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([vec![root.clone(), child.clone()]])
            .append_query_results([vec![sums(child.id, dec!(500), dec!(750))]])
            .into_connection();

        let rows = reader(&db)
            .rollup(&TenantSchema::parse("acme").unwrap(), None)
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "1.0");
        assert_eq!(rows[0].total_paid_self, Decimal::ZERO);
        assert_eq!(rows[0].total_paid_rollup, dec!(500));
        assert_eq!(rows[0].total_committed_rollup, dec!(750));
        assert_eq!(rows[1].total_paid_self, dec!(500));
    }

    #[tokio::test]
    async fn test_window_filters_expense_dates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([Vec::<wbs_nodes::Model>::new()])
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();
        let window = DateWindow::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        )
        .unwrap();

        let rows = reader(&db)
            .rollup(&TenantSchema::parse("acme").unwrap(), Some(window))
            .await
            .unwrap();

        assert!(rows.is_empty());
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("BETWEEN"));
        assert!(log.contains("GROUP BY"));
    }
}
