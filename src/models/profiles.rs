use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile type stored as a lowercase string in the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ProfileType {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "contractor")]
    Contractor,
}

/// SeaORM entity for the `profiles` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub balance: Decimal,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: ProfileType,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTimeUtc,
}

// Contracts reference profiles twice (client and contractor), so the
// joins are expressed from the contract side.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_client(&self) -> bool {
        self.kind == ProfileType::Client
    }

    pub fn is_contractor(&self) -> bool {
        self.kind == ProfileType::Contractor
    }
}

// ── DTOs ──

/// Request body for `POST /api/signup`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    #[serde(default)]
    pub profession: String,
    pub balance: Option<Decimal>,
    #[serde(rename = "type")]
    pub kind: ProfileType,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Used by the signup handler once the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub balance: Decimal,
    pub kind: ProfileType,
    pub username: String,
    pub password_hash: String,
}

/// A safe profile representation for API responses (never leaks the password hash).
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub balance: Decimal,
    #[serde(rename = "type")]
    pub kind: ProfileType,
    pub username: String,
    pub created_at: DateTimeUtc,
}

impl From<Model> for ProfileResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            profession: m.profession,
            balance: m.balance,
            kind: m.kind,
            username: m.username,
            created_at: m.created_at,
        }
    }
}
