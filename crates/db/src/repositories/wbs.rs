//! WBS tree store.

use chrono::Utc;
use costline_core::actor::ActingUser;
use costline_core::tenant::TenantSchema;
use costline_core::wbs::{
    DraftWorkflow, NewWbsLine, StatusChange, WbsCode, WbsError, WbsNode, WbsStatus,
};
use costline_shared::types::WbsNodeId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set,
};

use crate::entities::wbs_nodes;
use crate::error::StoreError;
use crate::scope::{SchemaScope, TransactionManager};

type Transition = fn(WbsStatus) -> Result<StatusChange, WbsError>;

/// Budget line persistence within one tenant namespace.
#[derive(Debug, Clone)]
pub struct WbsRepository {
    tx: TransactionManager,
}

impl WbsRepository {
    /// Creates a new WBS repository.
    #[must_use]
    pub const fn new(tx: TransactionManager) -> Self {
        Self { tx }
    }

    /// Creates a pending budget line.
    ///
    /// # Errors
    ///
    /// - `WbsError::ParentNotFound` if the parent id is unknown in this tenant
    /// - `WbsError::DuplicateCode` if the code is taken
    pub async fn create_draft(
        &self,
        schema: &TenantSchema,
        created_by: &ActingUser,
        line: NewWbsLine,
    ) -> Result<WbsNode, StoreError> {
        let scoped = self.tx.begin(&SchemaScope::Tenant(schema.clone())).await?;
        let result = insert_line(scoped.transaction(), &line, WbsStatus::Pending, created_by).await;
        let node = scoped.finish(result).await?;

        tracing::info!(tenant = %schema, code = %node.code, "created WBS draft");
        Ok(node)
    }

    /// Creates several pending lines atomically.
    ///
    /// Any failure, including a code repeated within the batch, rolls back
    /// every line.
    pub async fn create_draft_batch(
        &self,
        schema: &TenantSchema,
        created_by: &ActingUser,
        lines: Vec<NewWbsLine>,
    ) -> Result<Vec<WbsNode>, StoreError> {
        let scoped = self.tx.begin(&SchemaScope::Tenant(schema.clone())).await?;
        let result = insert_lines(scoped.transaction(), &lines, created_by).await;
        let nodes = scoped.finish(result).await?;
        tracing::info!(tenant = %schema, count = nodes.len(), "created WBS draft batch");
        Ok(nodes)
    }

    /// Approves a draft. Approving an approved line is a no-op.
    pub async fn approve(&self, schema: &TenantSchema, id: WbsNodeId) -> Result<WbsNode, StoreError> {
        self.transition(schema, id, DraftWorkflow::approve).await
    }

    /// Rejects a draft. Rejecting a rejected line is a no-op.
    pub async fn reject(&self, schema: &TenantSchema, id: WbsNodeId) -> Result<WbsNode, StoreError> {
        self.transition(schema, id, DraftWorkflow::reject).await
    }

    /// Finds a line by id.
    ///
    /// # Errors
    ///
    /// Returns `WbsError::NotFound` if the id is unknown in this tenant.
    pub async fn find_by_id(&self, schema: &TenantSchema, id: WbsNodeId) -> Result<WbsNode, StoreError> {
        let scoped = self.tx.begin(&SchemaScope::Tenant(schema.clone())).await?;
        let result = find_node(scoped.transaction(), id).await;
        scoped.finish(result).await
    }

    /// Finds a line by code.
    ///
    /// # Errors
    ///
    /// Returns `WbsError::CodeNotFound` if no line has the code.
    pub async fn find_by_code(&self, schema: &TenantSchema, code: &WbsCode) -> Result<WbsNode, StoreError> {
        let scoped = self.tx.begin(&SchemaScope::Tenant(schema.clone())).await?;
        let result = match find_model_by_code(scoped.transaction(), code.as_str()).await {
            Ok(Some(model)) => into_node(model),
            Ok(None) => Err(WbsError::CodeNotFound(code.to_string()).into()),
            Err(err) => Err(err),
        };
        scoped.finish(result).await
    }

    /// Lists lines awaiting a decision, in natural code order.
    pub async fn list_pending(&self, schema: &TenantSchema) -> Result<Vec<WbsNode>, StoreError> {
        self.list(schema, Some(WbsStatus::Pending)).await
    }

    /// Lists every line, in natural code order.
    pub async fn list_all(&self, schema: &TenantSchema) -> Result<Vec<WbsNode>, StoreError> {
        self.list(schema, None).await
    }

    async fn list(
        &self,
        schema: &TenantSchema,
        status: Option<WbsStatus>,
    ) -> Result<Vec<WbsNode>, StoreError> {
        let scoped = self.tx.begin(&SchemaScope::Tenant(schema.clone())).await?;

        let mut query = wbs_nodes::Entity::find();
        if let Some(status) = status {
            query = query.filter(wbs_nodes::Column::Status.eq(status.as_str()));
        }
        let result = match query.all(scoped.transaction()).await {
            Ok(models) => models.into_iter().map(into_node).collect::<Result<Vec<_>, _>>(),
            Err(err) => Err(err.into()),
        };

        let mut nodes = scoped.finish(result).await?;
        nodes.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(nodes)
    }

    async fn transition(
        &self,
        schema: &TenantSchema,
        id: WbsNodeId,
        rule: Transition,
    ) -> Result<WbsNode, StoreError> {
        let scoped = self.tx.begin(&SchemaScope::Tenant(schema.clone())).await?;
        let result = transition_internal(scoped.transaction(), id, rule).await;
        let (node, changed) = scoped.finish(result).await?;

        if changed {
            tracing::info!(tenant = %schema, code = %node.code, status = %node.status, "WBS status changed");
        }
        Ok(node)
    }
}

async fn insert_lines(
    txn: &DatabaseTransaction,
    lines: &[NewWbsLine],
    created_by: &ActingUser,
) -> Result<Vec<WbsNode>, StoreError> {
    let mut nodes = Vec::with_capacity(lines.len());
    for line in lines {
        nodes.push(insert_line(txn, line, WbsStatus::Pending, created_by).await?);
    }
    Ok(nodes)
}

async fn transition_internal(
    txn: &DatabaseTransaction,
    id: WbsNodeId,
    rule: Transition,
) -> Result<(WbsNode, bool), StoreError> {
    // Row lock so a concurrent approve/reject waits and then sees the terminal state.
    let model = wbs_nodes::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(WbsError::NotFound(id))?;
    let current = parse_status(&model.status)?;

    match rule(current)? {
        StatusChange::Unchanged => Ok((into_node(model)?, false)),
        StatusChange::Applied(status) => {
            let mut active: wbs_nodes::ActiveModel = model.into();
            active.status = Set(status.as_str().to_string());
            let updated = active.update(txn).await?;
            Ok((into_node(updated)?, true))
        }
    }
}

/// Inserts one line after checking its parent and code.
pub(crate) async fn insert_line<C: ConnectionTrait>(
    conn: &C,
    line: &NewWbsLine,
    status: WbsStatus,
    created_by: &ActingUser,
) -> Result<WbsNode, StoreError> {
    if let Some(parent) = line.parent_id() {
        let exists = wbs_nodes::Entity::find_by_id(parent.into_inner())
            .one(conn)
            .await?
            .is_some();
        if !exists {
            return Err(WbsError::ParentNotFound(parent).into());
        }
    }

    if find_model_by_code(conn, line.code().as_str()).await?.is_some() {
        return Err(WbsError::DuplicateCode(line.code().to_string()).into());
    }

    let model = wbs_nodes::ActiveModel {
        id: Set(WbsNodeId::new().into_inner()),
        parent_id: Set(line.parent_id().map(WbsNodeId::into_inner)),
        code: Set(line.code().to_string()),
        description: Set(line.description().to_string()),
        unit_cost: Set(line.unit_cost()),
        quantity: Set(line.quantity()),
        duration_days: Set(line.duration_days()),
        total_cost: Set(line.total_cost()),
        status: Set(status.as_str().to_string()),
        created_by: Set(Some(created_by.as_str().to_string())),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    into_node(model)
}

pub(crate) async fn find_model_by_code<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> Result<Option<wbs_nodes::Model>, StoreError> {
    Ok(wbs_nodes::Entity::find()
        .filter(wbs_nodes::Column::Code.eq(code))
        .one(conn)
        .await?)
}

pub(crate) async fn find_node<C: ConnectionTrait>(conn: &C, id: WbsNodeId) -> Result<WbsNode, StoreError> {
    let model = wbs_nodes::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(WbsError::NotFound(id))?;
    into_node(model)
}

fn parse_status(raw: &str) -> Result<WbsStatus, StoreError> {
    WbsStatus::parse(raw).ok_or_else(|| StoreError::corrupt("wbs_nodes", format!("status {raw:?}")))
}

pub(crate) fn into_node(model: wbs_nodes::Model) -> Result<WbsNode, StoreError> {
    let code = WbsCode::parse(&model.code)
        .map_err(|_| StoreError::corrupt("wbs_nodes", format!("code {:?}", model.code)))?;

    Ok(WbsNode {
        id: model.id.into(),
        parent_id: model.parent_id.map(Into::into),
        code,
        description: model.description,
        unit_cost: model.unit_cost,
        quantity: model.quantity,
        duration_days: model.duration_days,
        total_cost: model.total_cost,
        status: parse_status(&model.status)?,
        created_by: model.created_by,
        created_at: model.created_at.into(),
    })
}
