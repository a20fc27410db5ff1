//! Contract lifecycle: creation with its initial job, status transitions,
//! and contractor-added jobs.

use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::authorization::{require_client, require_contractor, verify_contract_party};
use crate::db::contracts as contract_db;
use crate::db::jobs as job_db;
use crate::db::profiles as profile_db;
use crate::error::AppError;
use crate::models::contracts::{self, CreateContract, CreateContractRequest, Status};
use crate::models::jobs::{self, CreateJob, DEFAULT_JOB_DESCRIPTION};
use crate::models::{money, profiles};

#[derive(Debug, Clone, Serialize)]
pub struct ContractWithJob {
    pub contract: contracts::Model,
    pub job: Option<jobs::Model>,
}

/// Create a contract between `client` and the requested contractor.
///
/// A contract that starts `in_progress` gets its initial job in the same
/// transaction; one that starts `new` gets a default job when it moves to
/// `in_progress`.
#[tracing::instrument(skip(db, client, request), fields(client_id = %client.id))]
pub async fn create_contract(
    db: &DatabaseConnection,
    client: &profiles::Model,
    request: CreateContractRequest,
) -> Result<ContractWithJob, AppError> {
    require_client(client, "create contracts")?;

    let status = request.status.unwrap_or(Status::InProgress);
    if status == Status::Terminated {
        return Err(AppError::Validation(
            "A contract cannot be created as terminated".into(),
        ));
    }

    let job_price = money::require_non_negative(
        request.job_price.unwrap_or(Decimal::ZERO),
        "job_price must be a non-negative amount with at most two decimal places",
    )?;

    let txn = db.begin().await?;

    let contractor = profile_db::get_profile_by_id(&txn, request.contractor_id)
        .await?
        .filter(|p| p.is_contractor())
        .ok_or_else(|| AppError::Validation("Invalid contractor".into()))?;

    let contract = contract_db::insert_contract(
        &txn,
        CreateContract {
            client_id: client.id,
            contractor_id: contractor.id,
            terms: request.terms,
            status,
        },
    )
    .await?;

    let job = if status == Status::InProgress {
        let job = job_db::insert_job(
            &txn,
            CreateJob {
                contract_id: contract.id,
                description: request
                    .job_description
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_JOB_DESCRIPTION.to_string()),
                price: job_price,
            },
        )
        .await?;
        Some(job)
    } else {
        None
    };

    txn.commit().await?;

    tracing::info!(contract_id = %contract.id, contractor_id = %contract.contractor_id, "contract created");

    Ok(ContractWithJob { contract, job })
}

/// Move a contract to `next`, creating the default job on `new -> in_progress`.
#[tracing::instrument(skip(db, user), fields(user_id = %user.id))]
pub async fn update_status(
    db: &DatabaseConnection,
    user: &profiles::Model,
    contract_id: Uuid,
    next: Status,
) -> Result<ContractWithJob, AppError> {
    let txn = db.begin().await?;

    let contract = verify_contract_party(&txn, contract_id, user.id).await?;
    let current = contract.status;

    if !current.can_transition_to(next) {
        return Err(AppError::InvalidState(format!(
            "Contract cannot move from {current:?} to {next:?}"
        )));
    }

    // Conditional on the status just read, so of two concurrent transitions
    // out of the same status only one applies.
    if !contract_db::transition_status(&txn, contract.id, current, next).await? {
        tracing::warn!(%contract_id, ?current, ?next, "status transition lost a race");
        return Err(AppError::InvalidState(format!(
            "Contract is no longer {current:?}"
        )));
    }
    let contract = contracts::Model {
        status: next,
        ..contract
    };

    let job = if current == Status::New && next == Status::InProgress {
        let job = job_db::insert_job(
            &txn,
            CreateJob {
                contract_id: contract.id,
                description: DEFAULT_JOB_DESCRIPTION.to_string(),
                price: Decimal::ZERO,
            },
        )
        .await?;
        Some(job)
    } else {
        None
    };

    txn.commit().await?;

    Ok(ContractWithJob { contract, job })
}

/// Add a job to an in-progress contract; only that contract's contractor may.
#[tracing::instrument(skip(db, contractor), fields(contractor_id = %contractor.id))]
pub async fn add_job(
    db: &DatabaseConnection,
    contractor: &profiles::Model,
    contract_id: Uuid,
    description: String,
    price: Decimal,
) -> Result<jobs::Model, AppError> {
    require_contractor(contractor, "add jobs to contracts")?;

    if description.trim().is_empty() {
        return Err(AppError::Validation("description is required".into()));
    }
    let price = money::require_positive(price, "Price must be greater than zero")?;

    let contract = contract_db::get_contract_by_id(db, contract_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contract not found".into()))?;

    if contract.contractor_id != contractor.id {
        return Err(AppError::Forbidden(
            "Only the contract's contractor can add jobs to it".into(),
        ));
    }

    if contract.status != Status::InProgress {
        return Err(AppError::InvalidState(
            "Jobs can only be added to active contracts".into(),
        ));
    }

    let job = job_db::insert_job(
        db,
        CreateJob {
            contract_id,
            description,
            price,
        },
    )
    .await?;

    Ok(job)
}
