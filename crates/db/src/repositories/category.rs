//! WBS category master data in the shared namespace.

use chrono::Utc;
use costline_core::category::{CategoryError, CategoryUpdate, NewCategory, WbsCategory};
use costline_core::tenant::TenantSchema;
use costline_core::wbs::compare_codes;
use costline_shared::types::CategoryId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use super::code_within;
use crate::entities::{wbs_categories, wbs_nodes};
use crate::error::StoreError;
use crate::scope::{SchemaScope, TransactionManager};

/// Category master data.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    tx: TransactionManager,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(tx: TransactionManager) -> Self {
        Self { tx }
    }

    /// Lists categories in natural code order.
    pub async fn list(&self) -> Result<Vec<WbsCategory>, StoreError> {
        let scoped = self.tx.begin_shared().await?;
        let result = wbs_categories::Entity::find().all(scoped.transaction()).await;
        let mut models = scoped.finish(result.map_err(StoreError::from)).await?;

        models.sort_by(|a, b| compare_codes(&a.code, &b.code));
        Ok(models.into_iter().map(into_category).collect())
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::DuplicateCode` if the code exists.
    pub async fn create(&self, category: NewCategory) -> Result<WbsCategory, StoreError> {
        let scoped = self.tx.begin_shared().await?;
        let result = create_internal(scoped.transaction(), &category).await;
        let model = scoped.finish(result).await?;

        Ok(into_category(model))
    }

    /// Updates code and/or description.
    ///
    /// # Errors
    ///
    /// - `CategoryError::NotFound` if the id is unknown
    /// - `CategoryError::DuplicateCode` if another category has the new code
    pub async fn update(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<WbsCategory, StoreError> {
        let update = update.validated()?;

        let scoped = self.tx.begin_shared().await?;
        let result = update_internal(scoped.transaction(), id, update).await;
        let model = scoped.finish(result).await?;

        Ok(into_category(model))
    }

    /// Deletes a category unless lines in `tenant` still fall under its code.
    ///
    /// # Errors
    ///
    /// - `CategoryError::NotFound` if the id is unknown
    /// - `CategoryError::InUse` if any line's code is within the category
    pub async fn delete(&self, tenant: &TenantSchema, id: CategoryId) -> Result<(), StoreError> {
        let scoped = self.tx.begin(&SchemaScope::Tenant(tenant.clone())).await?;
        let result = delete_internal(scoped.transaction(), id).await;
        let code = scoped.finish(result).await?;

        tracing::info!(tenant = %tenant, code = %code, "deleted WBS category");
        Ok(())
    }
}

async fn create_internal(
    txn: &DatabaseTransaction,
    category: &NewCategory,
) -> Result<wbs_categories::Model, StoreError> {
    let existing = wbs_categories::Entity::find()
        .filter(wbs_categories::Column::Code.eq(category.code()))
        .one(txn)
        .await?;
    if existing.is_some() {
        return Err(CategoryError::DuplicateCode(category.code().to_string()).into());
    }

    Ok(wbs_categories::ActiveModel {
        id: Set(CategoryId::new().into_inner()),
        code: Set(category.code().to_string()),
        description: Set(category.description().to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await?)
}

async fn update_internal(
    txn: &DatabaseTransaction,
    id: CategoryId,
    update: CategoryUpdate,
) -> Result<wbs_categories::Model, StoreError> {
    let model = find_model(txn, id).await?;
    if update.is_empty() {
        return Ok(model);
    }

    if let Some(code) = &update.code {
        let clash = wbs_categories::Entity::find()
            .filter(wbs_categories::Column::Code.eq(code.as_str()))
            .filter(wbs_categories::Column::Id.ne(id.into_inner()))
            .one(txn)
            .await?;
        if clash.is_some() {
            return Err(CategoryError::DuplicateCode(code.clone()).into());
        }
    }

    let mut active: wbs_categories::ActiveModel = model.into();
    if let Some(code) = update.code {
        active.code = Set(code);
    }
    if let Some(description) = update.description {
        active.description = Set(description);
    }
    Ok(active.update(txn).await?)
}

async fn delete_internal(txn: &DatabaseTransaction, id: CategoryId) -> Result<String, StoreError> {
    let model = find_model(txn, id).await?;

    let in_use = wbs_nodes::Entity::find()
        .filter(code_within(&model.code))
        .count(txn)
        .await?;
    if in_use > 0 {
        return Err(CategoryError::InUse(model.code).into());
    }

    wbs_categories::Entity::delete_by_id(model.id).exec(txn).await?;
    Ok(model.code)
}

async fn find_model(
    txn: &DatabaseTransaction,
    id: CategoryId,
) -> Result<wbs_categories::Model, StoreError> {
    wbs_categories::Entity::find_by_id(id.into_inner())
        .one(txn)
        .await?
        .ok_or_else(|| CategoryError::NotFound(id).into())
}

fn into_category(model: wbs_categories::Model) -> WbsCategory {
    WbsCategory {
        id: model.id.into(),
        code: model.code,
        description: model.description,
        created_at: model.created_at.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn model(code: &str) -> wbs_categories::Model {
        wbs_categories::Model {
            id: CategoryId::new().into_inner(),
            code: code.to_string(),
            description: format!("Category {code}"),
            created_at: Utc::now().into(),
        }
    }

    fn count(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::from(n))])
    }

    fn repo(db: &DatabaseConnection) -> CategoryRepository {
        CategoryRepository::new(TransactionManager::new(
            db.clone(),
            TenantSchema::parse("public").unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_list_in_natural_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok()])
            .append_query_results([vec![model("10"), model("2"), model("1")]])
            .into_connection();

        let codes: Vec<String> = repo(&db)
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.code)
            .collect();

        assert_eq!(codes, ["1", "2", "10"]);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok()])
            .append_query_results([vec![model("7")]])
            .into_connection();

        let err = repo(&db)
            .create(NewCategory::new("7", "Contingency").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Category(CategoryError::DuplicateCode(_))));
    }

    #[tokio::test]
    async fn test_delete_in_use_is_conflict() {
        let category = model("3");
        let id = CategoryId::from_uuid(category.id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok()])
            .append_query_results([vec![category]])
            .append_query_results([vec![count(2)]])
            .into_connection();

        let err = repo(&db)
            .delete(&TenantSchema::parse("acme").unwrap(), id)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Category(CategoryError::InUse(_))));
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_delete_unused_category() {
        let category = model("3");
        let id = CategoryId::from_uuid(category.id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok(), exec_ok()])
            .append_query_results([vec![category]])
            .append_query_results([vec![count(0)]])
            .into_connection();

        repo(&db)
            .delete(&TenantSchema::parse("acme").unwrap(), id)
            .await
            .unwrap();

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("DELETE FROM"));
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok()])
            .append_query_results([Vec::<wbs_categories::Model>::new()])
            .into_connection();

        let err = repo(&db)
            .update(
                CategoryId::new(),
                CategoryUpdate {
                    code: None,
                    description: Some("Renamed".into()),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Category(CategoryError::NotFound(_))));
    }
}
