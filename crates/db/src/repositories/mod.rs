//! Repositories over schema-scoped transactions.

pub mod category;
pub mod expense;
pub mod rollup;
pub mod seed;
pub mod tenant;
pub mod wbs;

pub use category::CategoryRepository;
pub use expense::ExpenseLedger;
pub use rollup::RollupReader;
pub use seed::TenantSeeder;
pub use tenant::{SchemaResolver, TenantRegistry};
pub use wbs::WbsRepository;

use rust_decimal::Decimal;
use sea_orm::sea_query::{Condition, LikeExpr};
use sea_orm::{ColumnTrait, FromQueryResult};

use crate::entities::wbs_nodes;

/// Single aggregated amount; `NULL` when no rows matched.
#[derive(Debug, FromQueryResult)]
pub(crate) struct SumRow {
    pub total: Option<Decimal>,
}

impl SumRow {
    pub(crate) fn or_zero(row: Option<Self>) -> Decimal {
        row.and_then(|r| r.total).unwrap_or_default()
    }
}

/// Nodes whose code equals `prefix` or starts with `prefix.`.
pub(crate) fn code_within(prefix: &str) -> Condition {
    let pattern = format!("{}.%", escape_like(prefix));
    Condition::any()
        .add(wbs_nodes::Column::Code.eq(prefix))
        .add(wbs_nodes::Column::Code.like(LikeExpr::new(pattern).escape('\\')))
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("1"), "1");
        assert_eq!(escape_like("A_1%"), "A\\_1\\%");
    }
}
