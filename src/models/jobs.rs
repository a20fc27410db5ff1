use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_JOB_DESCRIPTION: &str = "Initial contract job";

/// SeaORM entity for the `jobs` table.
///
/// `payment_date` is `Some` exactly when `paid` is true; both are written
/// together by the settlement service.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contract_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub price: Decimal,
    pub paid: bool,
    pub payment_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contracts::Entity",
        from = "Column::ContractId",
        to = "super::contracts::Column::Id"
    )]
    Contract,
}

impl Related<super::contracts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone)]
pub struct CreateJob {
    pub contract_id: Uuid,
    pub description: String,
    pub price: Decimal,
}

/// Request body for `POST /api/contracts/{id}/jobs`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub price: Decimal,
}
