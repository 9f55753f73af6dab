//! `SeaORM` Entity for the tenant-scoped expense_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub wbs_id: Uuid,
    pub user_id: String,
    pub expense_date: Date,
    #[sea_orm(column_type = "Text")]
    pub item_description: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub commitment_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub paid_amount: Decimal,
    pub document_reference: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub variance_flag: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wbs_nodes::Entity",
        from = "Column::WbsId",
        to = "super::wbs_nodes::Column::Id"
    )]
    WbsNodes,
}

impl Related<super::wbs_nodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WbsNodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
