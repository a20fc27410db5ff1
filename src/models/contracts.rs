use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Contract status stored as a lowercase string in the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "terminated")]
    Terminated,
}

impl Status {
    /// Whether a contract may move from `self` to `next`.
    pub fn can_transition_to(self, next: Status) -> bool {
        matches!(
            (self, next),
            (Status::New, Status::InProgress)
                | (Status::New, Status::Terminated)
                | (Status::InProgress, Status::Terminated)
        )
    }
}

/// SeaORM entity for the `contracts` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub terms: String,
    pub status: Status,
    pub client_id: Uuid,
    pub contractor_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ClientId",
        to = "super::profiles::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ContractorId",
        to = "super::profiles::Column::Id"
    )]
    Contractor,
    #[sea_orm(has_many = "super::jobs::Entity")]
    Jobs,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_party(&self, profile_id: Uuid) -> bool {
        self.client_id == profile_id || self.contractor_id == profile_id
    }
}

// ── DTOs ──

/// Request body for `POST /api/contracts`. The client comes from the JWT.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContractRequest {
    pub contractor_id: Uuid,
    #[validate(length(min = 1, message = "terms are required"))]
    pub terms: String,
    pub status: Option<Status>,
    pub job_description: Option<String>,
    pub job_price: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct CreateContract {
    pub client_id: Uuid,
    pub contractor_id: Uuid,
    pub terms: String,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContractStatus {
    pub status: Status,
}

/// Query string for `GET /api/contracts?status=`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractListQuery {
    pub status: Option<Status>,
}

impl ContractListQuery {
    pub fn status(&self) -> Status {
        self.status.unwrap_or(Status::InProgress)
    }
}
