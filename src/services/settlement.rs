//! Money movement: client deposits and job payments.
//!
//! Both operations run read-compute-write inside a single database
//! transaction. Rows that are read to make a decision are locked
//! (`SELECT ... FOR UPDATE` on Postgres) so concurrent requests against the
//! same client or job serialize instead of racing. Dropping the transaction
//! on any error path rolls back every write made so far.

use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use uuid::Uuid;

use crate::db::contracts as contract_db;
use crate::db::jobs as job_db;
use crate::db::profiles as profile_db;
use crate::error::AppError;
use crate::models::contracts::Status;
use crate::models::profiles::{self, ProfileType};
use crate::models::{jobs, money};

/// Share of the outstanding unpaid-job total a client may deposit at once (25%).
pub const DEPOSIT_CAP_RATIO: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

#[derive(Debug, Clone, Serialize)]
pub struct DepositReceipt {
    pub client_id: Uuid,
    pub new_balance: Decimal,
    pub deposit_amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub job: jobs::Model,
    pub client_balance: Decimal,
    pub contractor_balance: Decimal,
}

/// Largest deposit allowed against `unpaid_total`.
pub fn deposit_cap(unpaid_total: Decimal) -> Decimal {
    (unpaid_total * DEPOSIT_CAP_RATIO).normalize()
}

/// Credit `amount` to a client's balance, capped at 25% of what the client
/// currently owes on unpaid jobs under in-progress contracts.
#[tracing::instrument(skip(db))]
pub async fn deposit(
    db: &DatabaseConnection,
    client_id: Uuid,
    amount: Decimal,
) -> Result<DepositReceipt, AppError> {
    let amount = money::require_positive(
        amount,
        "Amount must be a positive number with at most two decimal places",
    )?;

    let txn = db.begin().await?;

    let client = profile_db::lock_profile_of_type(&txn, client_id, ProfileType::Client)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".into()))?;

    if !contract_db::has_client_contract_in_status(&txn, client_id, Status::InProgress).await? {
        return Err(AppError::InvalidState(
            "Client has no active contracts".into(),
        ));
    }

    let (unpaid_jobs, unpaid_total) = job_db::get_unpaid_summary(&txn, client_id).await?;
    if unpaid_jobs == 0 {
        return Err(AppError::InvalidState("Client has no unpaid jobs".into()));
    }

    let cap = deposit_cap(unpaid_total);
    if amount > cap {
        tracing::warn!(%client_id, %amount, %cap, "deposit rejected: over cap");
        return Err(AppError::DepositLimitExceeded { cap });
    }

    let new_balance = client.balance + amount;
    let client = profile_db::set_balance(&txn, client, new_balance).await?;

    txn.commit().await?;

    tracing::info!(%client_id, %amount, new_balance = %client.balance, "deposit settled");

    Ok(DepositReceipt {
        client_id,
        new_balance: client.balance,
        deposit_amount: amount,
    })
}

/// Pay for a job out of the payer's balance into the contractor's.
///
/// The job is claimed first with a conditional update, so of two concurrent
/// payments for the same job exactly one sees the claim succeed; the other
/// fails with `AlreadyPaid`. The client's balance is re-read under lock
/// rather than trusted from `payer`.
#[tracing::instrument(skip(db, payer), fields(payer_id = %payer.id))]
pub async fn pay_for_job(
    db: &DatabaseConnection,
    payer: &profiles::Model,
    job_id: Uuid,
) -> Result<PaymentReceipt, AppError> {
    if !payer.is_client() {
        return Err(AppError::Forbidden("Only clients can pay for jobs".into()));
    }

    let txn = db.begin().await?;

    let job = job_db::get_job_by_id(&txn, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

    let contract = contract_db::get_contract_by_id(&txn, job.contract_id)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!("Job {job_id} references a missing contract"))
        })?;

    if contract.client_id != payer.id {
        return Err(AppError::Forbidden(
            "You can only pay for your own jobs".into(),
        ));
    }

    let paid_at = chrono::Utc::now();
    if !job_db::claim_unpaid_job(&txn, job_id, paid_at).await? {
        tracing::warn!(%job_id, "payment rejected: already paid");
        return Err(AppError::AlreadyPaid(job_id));
    }

    // Lock order is always client then contractor.
    let client = profile_db::lock_profile_of_type(&txn, payer.id, ProfileType::Client)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".into()))?;

    if client.balance < job.price {
        tracing::warn!(
            %job_id,
            price = %job.price,
            balance = %client.balance,
            "payment rejected: insufficient funds"
        );
        return Err(AppError::InsufficientFunds {
            required: job.price,
            available: client.balance,
        });
    }

    let contractor =
        profile_db::lock_profile_of_type(&txn, contract.contractor_id, ProfileType::Contractor)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Contract {} references a missing contractor",
                    contract.id
                ))
            })?;

    let price = job.price;
    let client_balance = client.balance - price;
    let contractor_balance = contractor.balance + price;

    let client = profile_db::set_balance(&txn, client, client_balance).await?;
    let contractor = profile_db::set_balance(&txn, contractor, contractor_balance).await?;

    txn.commit().await?;

    tracing::info!(
        %job_id,
        %price,
        client_id = %client.id,
        contractor_id = %contractor.id,
        "job paid"
    );

    Ok(PaymentReceipt {
        job: jobs::Model {
            paid: true,
            payment_date: Some(paid_at),
            ..job
        },
        client_balance: client.balance,
        contractor_balance: contractor.balance,
    })
}
