//! Tenant registry in the shared namespace.

use async_trait::async_trait;
use chrono::Utc;
use costline_core::tenant::{NewTenant, Tenant, TenantError, TenantSchema, TenantUpdate};
use costline_shared::types::TenantId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::tenants;
use crate::error::StoreError;
use crate::scope::TransactionManager;

/// Maps an authenticated tenant to its namespace.
#[async_trait]
pub trait SchemaResolver {
    /// Returns the validated namespace of a registered tenant.
    async fn resolve_schema(&self, tenant_id: TenantId) -> Result<TenantSchema, StoreError>;
}

/// Tenant registry.
///
/// Registration records the tenant only. Creating and dropping the
/// namespace itself is left to provisioning.
#[derive(Debug, Clone)]
pub struct TenantRegistry {
    tx: TransactionManager,
}

impl TenantRegistry {
    /// Creates a new tenant registry.
    #[must_use]
    pub const fn new(tx: TransactionManager) -> Self {
        Self { tx }
    }

    /// Registers a tenant.
    ///
    /// # Errors
    ///
    /// - `TenantError::ReservedSchemaName` if the derived namespace is the
    ///   shared namespace
    /// - `TenantError::DuplicateName` if the name or the derived namespace is
    ///   already registered
    pub async fn register(&self, tenant: NewTenant) -> Result<Tenant, StoreError> {
        if tenant.schema_name() == self.tx.shared_schema() {
            tracing::warn!(schema = %tenant.schema_name(), "rejected tenant on the shared namespace");
            return Err(TenantError::ReservedSchemaName(tenant.schema_name().to_string()).into());
        }

        let scoped = self.tx.begin_shared().await?;
        let result = register_internal(scoped.transaction(), &tenant).await;
        let registered = scoped.finish(result).await?;

        tracing::info!(tenant = %registered.name, schema = %registered.schema_name, "registered tenant");
        Ok(registered)
    }

    /// Lists tenants by name.
    pub async fn list(&self) -> Result<Vec<Tenant>, StoreError> {
        let scoped = self.tx.begin_shared().await?;
        let result = tenants::Entity::find()
            .order_by_asc(tenants::Column::Name)
            .all(scoped.transaction())
            .await;
        let models = scoped.finish(result.map_err(StoreError::from)).await?;

        models.into_iter().map(into_tenant).collect()
    }

    /// Finds a tenant.
    ///
    /// # Errors
    ///
    /// Returns `TenantError::NotFound` if the id is unknown.
    pub async fn find(&self, id: TenantId) -> Result<Tenant, StoreError> {
        let scoped = self.tx.begin_shared().await?;
        let result = find_model(scoped.transaction(), id).await;
        let model = scoped.finish(result).await?;

        into_tenant(model)
    }

    /// Updates the name and/or project name. The namespace never changes.
    pub async fn update(&self, id: TenantId, update: TenantUpdate) -> Result<Tenant, StoreError> {
        let update = update.validated()?;

        let scoped = self.tx.begin_shared().await?;
        let result = update_internal(scoped.transaction(), id, update).await;
        let model = scoped.finish(result).await?;

        into_tenant(model)
    }

    /// Removes the registry row. The tenant's namespace and data remain.
    pub async fn delete(&self, id: TenantId) -> Result<(), StoreError> {
        let scoped = self.tx.begin_shared().await?;
        let result = delete_internal(scoped.transaction(), id).await;
        let model = scoped.finish(result).await?;

        tracing::warn!(
            tenant = %model.name,
            schema = %model.schema_name,
            "tenant unregistered; namespace was not dropped"
        );
        Ok(())
    }
}

#[async_trait]
impl SchemaResolver for TenantRegistry {
    async fn resolve_schema(&self, tenant_id: TenantId) -> Result<TenantSchema, StoreError> {
        Ok(self.find(tenant_id).await?.schema_name)
    }
}

async fn register_internal(
    txn: &DatabaseTransaction,
    tenant: &NewTenant,
) -> Result<Tenant, StoreError> {
    let clash = tenants::Entity::find()
        .filter(
            Condition::any()
                .add(tenants::Column::Name.eq(tenant.name()))
                .add(tenants::Column::SchemaName.eq(tenant.schema_name().as_str())),
        )
        .one(txn)
        .await?;
    if clash.is_some() {
        return Err(TenantError::DuplicateName(tenant.name().to_string()).into());
    }

    let model = tenants::ActiveModel {
        id: Set(TenantId::new().into_inner()),
        name: Set(tenant.name().to_string()),
        project_name: Set(tenant.project_name().to_string()),
        schema_name: Set(tenant.schema_name().to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await?;

    into_tenant(model)
}

async fn update_internal(
    txn: &DatabaseTransaction,
    id: TenantId,
    update: TenantUpdate,
) -> Result<tenants::Model, StoreError> {
    let model = find_model(txn, id).await?;
    if update.name.is_none() && update.project_name.is_none() {
        return Ok(model);
    }

    if let Some(name) = &update.name {
        let clash = tenants::Entity::find()
            .filter(tenants::Column::Name.eq(name.as_str()))
            .filter(tenants::Column::Id.ne(id.into_inner()))
            .one(txn)
            .await?;
        if clash.is_some() {
            return Err(TenantError::DuplicateName(name.clone()).into());
        }
    }

    let mut active: tenants::ActiveModel = model.into();
    if let Some(name) = update.name {
        active.name = Set(name);
    }
    if let Some(project_name) = update.project_name {
        active.project_name = Set(project_name);
    }
    Ok(active.update(txn).await?)
}

async fn delete_internal(
    txn: &DatabaseTransaction,
    id: TenantId,
) -> Result<tenants::Model, StoreError> {
    let model = find_model(txn, id).await?;
    tenants::Entity::delete_by_id(model.id).exec(txn).await?;
    Ok(model)
}

async fn find_model(txn: &DatabaseTransaction, id: TenantId) -> Result<tenants::Model, StoreError> {
    tenants::Entity::find_by_id(id.into_inner())
        .one(txn)
        .await?
        .ok_or_else(|| TenantError::NotFound(id).into())
}

fn into_tenant(model: tenants::Model) -> Result<Tenant, StoreError> {
    let schema_name = TenantSchema::parse(&model.schema_name)
        .map_err(|_| StoreError::corrupt("tenants", format!("schema_name {:?}", model.schema_name)))?;

    Ok(Tenant {
        id: model.id.into(),
        name: model.name,
        project_name: model.project_name,
        schema_name,
        created_at: model.created_at.into(),
    })
}
