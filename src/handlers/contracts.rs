use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::verify_contract_party;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::contracts as contract_db;
use crate::error::AppError;
use crate::models::contracts::{ContractListQuery, CreateContractRequest, UpdateContractStatus};
use crate::models::jobs::CreateJobRequest;
use crate::services::contracts as contract_service;

/// POST /api/contracts: a client opens a contract with a contractor.
///
/// The client comes from the JWT. An `in_progress` contract (the default)
/// is created together with its initial job.
pub async fn create_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateContractRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = contract_service::create_contract(db.get_ref(), &user.0, body).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/contracts/{id}: only the client or the contractor may view it.
pub async fn get_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let contract = verify_contract_party(db.get_ref(), path.into_inner(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(contract))
}

/// GET /api/contracts?status=: the caller's contracts in one status
/// (default `in_progress`), whichever side of them the caller is on.
pub async fn get_contracts(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ContractListQuery>,
) -> Result<HttpResponse, AppError> {
    let contracts =
        contract_db::get_contracts_for_party(db.get_ref(), user.0.id, Some(query.status()))
            .await?;

    if contracts.is_empty() {
        return Err(AppError::NotFound("No contracts found".into()));
    }

    Ok(HttpResponse::Ok().json(contracts))
}

/// PUT /api/contracts/{id}/status: either party moves the contract along.
pub async fn update_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateContractStatus>,
) -> Result<HttpResponse, AppError> {
    let updated =
        contract_service::update_status(db.get_ref(), &user.0, path.into_inner(), body.status)
            .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// POST /api/contracts/{id}/jobs: the contractor bills a new job.
pub async fn create_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CreateJobRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let job = contract_service::add_job(
        db.get_ref(),
        &user.0,
        path.into_inner(),
        body.description,
        body.price,
    )
    .await?;

    Ok(HttpResponse::Created().json(job))
}
