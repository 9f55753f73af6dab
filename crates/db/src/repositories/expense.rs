//! Expense ledger.
//!
//! Recording an expense reads the target line and its category totals and
//! inserts the entry in the same transaction. Without the category lock,
//! two concurrent recordings in one category can each miss the other's
//! amount and neither will be flagged as an overrun. Flags are never
//! recomputed.

use chrono::Utc;
use costline_core::actor::ActingUser;
use costline_core::expense::{ExpenseEntry, ExpenseError, NewExpense};
use costline_core::tenant::TenantSchema;
use costline_core::variance::{CategoryTotals, VarianceClassifier, VarianceFlag};
use costline_core::wbs::WbsNode;
use costline_shared::VarianceConfig;
use costline_shared::types::WbsNodeId;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, EntityTrait,
    NotSet, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, Statement, Value,
};
use sea_orm::sea_query::JoinType;

use super::{SumRow, code_within};
use crate::entities::{expense_entries, wbs_nodes};
use crate::error::StoreError;
use crate::repositories::wbs::into_node;
use crate::scope::{SchemaScope, TransactionManager};

/// Append-only expense store.
#[derive(Debug, Clone)]
pub struct ExpenseLedger {
    tx: TransactionManager,
    classifier: VarianceClassifier,
    lock_category: bool,
}

impl ExpenseLedger {
    /// Creates a ledger with the default policy and no category lock.
    #[must_use]
    pub fn new(tx: TransactionManager) -> Self {
        Self {
            tx,
            classifier: VarianceClassifier::default(),
            lock_category: false,
        }
    }

    /// Creates a ledger from the variance configuration.
    #[must_use]
    pub fn from_config(tx: TransactionManager, config: &VarianceConfig) -> Self {
        Self {
            tx,
            classifier: VarianceClassifier::new(config.into()),
            lock_category: config.lock_category,
        }
    }

    /// Records an expense and its variance flag.
    ///
    /// `recorded_by` comes from the caller's authenticated context.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NodeNotFound` if the line is unknown in this
    /// tenant; nothing is written in that case.
    pub async fn record(
        &self,
        schema: &TenantSchema,
        recorded_by: &ActingUser,
        expense: NewExpense,
    ) -> Result<ExpenseEntry, StoreError> {
        let scoped = self.tx.begin(&SchemaScope::Tenant(schema.clone())).await?;
        let result = self
            .record_internal(scoped.transaction(), schema, recorded_by, &expense)
            .await;
        let entry = scoped.finish(result).await?;

        if entry.variance_flag.is_major() {
            tracing::info!(
                tenant = %schema,
                wbs_id = %entry.wbs_id,
                expense_id = entry.id,
                flag = %entry.variance_flag,
                "major variance recorded"
            );
        }
        Ok(entry)
    }

    async fn record_internal(
        &self,
        txn: &DatabaseTransaction,
        schema: &TenantSchema,
        recorded_by: &ActingUser,
        expense: &NewExpense,
    ) -> Result<ExpenseEntry, StoreError> {
        let node = wbs_nodes::Entity::find_by_id(expense.wbs_id().into_inner())
            .one(txn)
            .await?
            .ok_or(ExpenseError::NodeNotFound(expense.wbs_id()))?;
        let node = into_node(node)?;

        let flag = self.classify(txn, schema, &node, expense.paid_amount()).await?;

        let model = expense_entries::ActiveModel {
            id: NotSet,
            wbs_id: Set(node.id.into_inner()),
            user_id: Set(recorded_by.as_str().to_string()),
            expense_date: Set(expense
                .expense_date()
                .unwrap_or_else(|| Utc::now().date_naive())),
            item_description: Set(expense.item_description().to_string()),
            unit_cost: Set(expense.unit_cost()),
            quantity: Set(expense.quantity()),
            commitment_amount: Set(expense.commitment_amount()),
            paid_amount: Set(expense.paid_amount()),
            document_reference: Set(expense.document_reference().map(str::to_string)),
            notes: Set(expense.notes().map(str::to_string)),
            variance_flag: Set(flag.as_str().to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(txn)
        .await?;

        into_entry(model)
    }

    async fn classify(
        &self,
        txn: &DatabaseTransaction,
        schema: &TenantSchema,
        node: &WbsNode,
        paid: Decimal,
    ) -> Result<VarianceFlag, StoreError> {
        let line_flag = self.classifier.classify_line(&node.code, node.total_cost, paid);
        if line_flag.is_major() {
            return Ok(line_flag);
        }

        let category = node.code.category();
        if self.lock_category {
            lock_category(txn, schema, category).await?;
        }
        let totals = category_totals(txn, category).await?;

        Ok(self.classifier.apply_category(line_flag, totals, paid))
    }

    /// Entries flagged as a major variance. Order is unspecified.
    pub async fn find_major_variance_entries(
        &self,
        schema: &TenantSchema,
    ) -> Result<Vec<ExpenseEntry>, StoreError> {
        let major: Vec<&str> = VarianceFlag::MAJOR.iter().map(VarianceFlag::as_str).collect();

        let scoped = self.tx.begin(&SchemaScope::Tenant(schema.clone())).await?;
        let result = expense_entries::Entity::find()
            .filter(expense_entries::Column::VarianceFlag.is_in(major))
            .all(scoped.transaction())
            .await;
        let models = scoped.finish(result.map_err(StoreError::from)).await?;

        models.into_iter().map(into_entry).collect()
    }

    /// Entries for one line, newest first.
    pub async fn list_for_node(
        &self,
        schema: &TenantSchema,
        wbs_id: WbsNodeId,
    ) -> Result<Vec<ExpenseEntry>, StoreError> {
        let scoped = self.tx.begin(&SchemaScope::Tenant(schema.clone())).await?;
        let result = expense_entries::Entity::find()
            .filter(expense_entries::Column::WbsId.eq(wbs_id.into_inner()))
            .order_by_desc(expense_entries::Column::ExpenseDate)
            .order_by_desc(expense_entries::Column::Id)
            .all(scoped.transaction())
            .await;
        let models = scoped.finish(result.map_err(StoreError::from)).await?;

        models.into_iter().map(into_entry).collect()
    }
}

/// Serializes classifications in one category until the transaction ends.
async fn lock_category(
    txn: &DatabaseTransaction,
    schema: &TenantSchema,
    category: &str,
) -> Result<(), StoreError> {
    let key = format!("{schema}:{category}");
    txn.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT pg_advisory_xact_lock(hashtextextended($1, 0))",
        [Value::from(key)],
    ))
    .await?;
    Ok(())
}

/// Budget and paid totals for every line whose code is within `category`.
pub(crate) async fn category_totals(
    txn: &DatabaseTransaction,
    category: &str,
) -> Result<CategoryTotals, StoreError> {
    let budgeted = wbs_nodes::Entity::find()
        .select_only()
        .column_as(wbs_nodes::Column::TotalCost.sum(), "total")
        .filter(code_within(category))
        .into_model::<SumRow>()
        .one(txn)
        .await?;

    let prior_paid = expense_entries::Entity::find()
        .select_only()
        .column_as(expense_entries::Column::PaidAmount.sum(), "total")
        .join(JoinType::InnerJoin, expense_entries::Relation::WbsNodes.def())
        .filter(code_within(category))
        .into_model::<SumRow>()
        .one(txn)
        .await?;

    Ok(CategoryTotals {
        budgeted: SumRow::or_zero(budgeted),
        prior_paid: SumRow::or_zero(prior_paid),
    })
}

fn into_entry(model: expense_entries::Model) -> Result<ExpenseEntry, StoreError> {
    let variance_flag = VarianceFlag::parse(&model.variance_flag).ok_or_else(|| {
        StoreError::corrupt(
            "expense_entries",
            format!("variance_flag {:?}", model.variance_flag),
        )
    })?;

    Ok(ExpenseEntry {
        id: model.id,
        wbs_id: model.wbs_id.into(),
        user_id: model.user_id,
        expense_date: model.expense_date,
        item_description: model.item_description,
        unit_cost: model.unit_cost,
        quantity: model.quantity,
        commitment_amount: model.commitment_amount,
        paid_amount: model.paid_amount,
        document_reference: model.document_reference,
        notes: model.notes,
        variance_flag,
        created_at: model.created_at.into(),
    })
}
