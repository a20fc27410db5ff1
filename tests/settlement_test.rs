//! Deposit and payment behaviour against a real (SQLite) database.
//!
//! Run with: `cargo test --test settlement_test`
mod common;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::TransactionTrait;
use uuid::Uuid;

use common::*;
use marketplace_backend::db::jobs as job_db;
use marketplace_backend::error::AppError;
use marketplace_backend::models::contracts::Status;
use marketplace_backend::services::settlement;

// ── Deposits ──

#[tokio::test]
async fn deposit_up_to_the_cap_is_credited() {
    let db = setup_db().await;
    let client = client(&db, "Alice", d("10")).await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;
    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    job(&db, &active, d("200")).await;
    job(&db, &active, d("200")).await;

    let receipt = settlement::deposit(&db, client.id, d("100")).await.unwrap();

    assert_eq!(receipt.client_id, client.id);
    assert_eq!(receipt.deposit_amount, d("100"));
    assert_eq!(receipt.new_balance, d("110"));
    assert_eq!(balance_of(&db, client.id).await, d("110"));
}

#[tokio::test]
async fn deposit_raises_the_balance_by_exactly_the_amount() {
    let db = setup_db().await;
    let client = client(&db, "Alice", d("0.1")).await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;
    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    job(&db, &active, d("10")).await;

    let receipt = settlement::deposit(&db, client.id, d("0.2")).await.unwrap();

    assert_eq!(receipt.new_balance, d("0.3"));
    assert_eq!(balance_of(&db, client.id).await - d("0.1"), d("0.2"));
}

#[tokio::test]
async fn deposit_over_the_cap_is_rejected_with_the_cap() {
    let db = setup_db().await;
    let client = client(&db, "Alice", d("10")).await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;
    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    job(&db, &active, d("400")).await;

    let err = settlement::deposit(&db, client.id, d("100.01")).await.unwrap_err();

    match err {
        AppError::DepositLimitExceeded { cap } => assert_eq!(cap, d("100")),
        other => panic!("expected DepositLimitExceeded, got {other:?}"),
    }
    assert_eq!(balance_of(&db, client.id).await, d("10"));
}

#[tokio::test]
async fn deposit_cap_only_counts_unpaid_jobs_on_active_contracts() {
    let db = setup_db().await;
    let client = client(&db, "Alice", Decimal::ZERO).await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;

    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    job(&db, &active, d("100")).await;
    paid_job(&db, &active, d("1000"), Utc::now()).await;

    let finished = contract(&db, &client, &contractor, Status::Terminated).await;
    job(&db, &finished, d("1000")).await;

    let err = settlement::deposit(&db, client.id, d("25.01")).await.unwrap_err();
    assert!(matches!(err, AppError::DepositLimitExceeded { cap } if cap == d("25")));

    let receipt = settlement::deposit(&db, client.id, d("25")).await.unwrap();
    assert_eq!(receipt.new_balance, d("25"));
}

#[tokio::test]
async fn deposit_without_active_contracts_fails() {
    let db = setup_db().await;
    let client = client(&db, "Alice", Decimal::ZERO).await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;
    let pending = contract(&db, &client, &contractor, Status::New).await;
    job(&db, &pending, d("500")).await;

    let err = settlement::deposit(&db, client.id, d("1")).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidState(_)));
    assert_eq!(balance_of(&db, client.id).await, Decimal::ZERO);
}

#[tokio::test]
async fn deposit_without_unpaid_jobs_fails() {
    let db = setup_db().await;
    let client = client(&db, "Alice", Decimal::ZERO).await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;
    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    paid_job(&db, &active, d("300"), Utc::now()).await;

    let err = settlement::deposit(&db, client.id, d("1")).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
async fn deposit_for_unknown_or_contractor_profile_is_not_found() {
    let db = setup_db().await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;

    let err = settlement::deposit(&db, Uuid::new_v4(), d("1")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = settlement::deposit(&db, contractor.id, d("1")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn deposit_rejects_amounts_that_are_not_positive_cents() {
    let db = setup_db().await;
    let client = client(&db, "Alice", Decimal::ZERO).await;

    for amount in ["0", "-5", "0.001"] {
        let err = settlement::deposit(&db, client.id, d(amount)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "amount {amount}");
    }
}

// ── Payments ──

#[tokio::test]
async fn payment_moves_exactly_the_price() {
    let db = setup_db().await;
    let client = client(&db, "Alice", d("500")).await;
    let contractor = contractor(&db, "Bob", "Plumber", d("50")).await;
    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    let job = job(&db, &active, d("120")).await;

    let receipt = settlement::pay_for_job(&db, &client, job.id).await.unwrap();

    assert_eq!(receipt.client_balance, d("380"));
    assert_eq!(receipt.contractor_balance, d("170"));
    assert!(receipt.job.paid);
    assert!(receipt.job.payment_date.is_some());

    assert_eq!(balance_of(&db, client.id).await, d("380"));
    assert_eq!(balance_of(&db, contractor.id).await, d("170"));
    let stored = reload_job(&db, job.id).await;
    assert!(stored.paid);
    assert!(stored.payment_date.is_some());
}

#[tokio::test]
async fn payment_conserves_fractional_amounts() {
    let db = setup_db().await;
    let client = client(&db, "Alice", d("0.2")).await;
    let contractor = contractor(&db, "Bob", "Plumber", d("1.1")).await;
    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    let job = job(&db, &active, d("0.1")).await;

    settlement::pay_for_job(&db, &client, job.id).await.unwrap();

    let client_after = balance_of(&db, client.id).await;
    let contractor_after = balance_of(&db, contractor.id).await;
    assert_eq!(client_after, d("0.1"));
    assert_eq!(contractor_after, d("1.2"));
    assert_eq!(client_after + contractor_after, d("1.3"));
}

#[tokio::test]
async fn paying_twice_fails_and_changes_nothing() {
    let db = setup_db().await;
    let client = client(&db, "Alice", d("500")).await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;
    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    let job = job(&db, &active, d("100")).await;

    settlement::pay_for_job(&db, &client, job.id).await.unwrap();
    let first_payment = reload_job(&db, job.id).await.payment_date;

    let err = settlement::pay_for_job(&db, &client, job.id).await.unwrap_err();

    assert!(matches!(err, AppError::AlreadyPaid(id) if id == job.id));
    assert_eq!(balance_of(&db, client.id).await, d("400"));
    assert_eq!(balance_of(&db, contractor.id).await, d("100"));
    assert_eq!(reload_job(&db, job.id).await.payment_date, first_payment);
}

#[tokio::test]
async fn insufficient_funds_rolls_back_the_claim() {
    let db = setup_db().await;
    let client = client(&db, "Alice", d("99")).await;
    let contractor = contractor(&db, "Bob", "Plumber", d("5")).await;
    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    let job = job(&db, &active, d("100")).await;

    let err = settlement::pay_for_job(&db, &client, job.id).await.unwrap_err();

    match err {
        AppError::InsufficientFunds { required, available } => {
            assert_eq!(required, d("100"));
            assert_eq!(available, d("99"));
        }
        other => panic!("expected InsufficientFunds, got {other:?}"),
    }
    let stored = reload_job(&db, job.id).await;
    assert!(!stored.paid);
    assert!(stored.payment_date.is_none());
    assert_eq!(balance_of(&db, client.id).await, d("99"));
    assert_eq!(balance_of(&db, contractor.id).await, d("5"));
}

#[tokio::test]
async fn balance_is_reread_instead_of_trusting_the_caller() {
    let db = setup_db().await;
    let client = client(&db, "Alice", Decimal::ZERO).await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;
    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    let job = job(&db, &active, d("10")).await;

    let mut stale = client.clone();
    stale.balance = d("1000");

    let err = settlement::pay_for_job(&db, &stale, job.id).await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientFunds { .. }));
}

#[tokio::test]
async fn only_the_contract_client_may_pay() {
    let db = setup_db().await;
    let owner = client(&db, "Alice", d("500")).await;
    let stranger = client(&db, "Carol", d("500")).await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;
    let active = contract(&db, &owner, &contractor, Status::InProgress).await;
    let job = job(&db, &active, d("100")).await;

    let err = settlement::pay_for_job(&db, &stranger, job.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = settlement::pay_for_job(&db, &contractor, job.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    assert!(!reload_job(&db, job.id).await.paid);
    assert_eq!(balance_of(&db, stranger.id).await, d("500"));
}

#[tokio::test]
async fn paying_an_unknown_job_is_not_found() {
    let db = setup_db().await;
    let client = client(&db, "Alice", d("500")).await;

    let err = settlement::pay_for_job(&db, &client, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ── Claiming ──

#[tokio::test]
async fn claim_is_decided_by_the_stored_row_not_the_callers_copy() {
    let db = setup_db().await;
    let client = client(&db, "Alice", d("500")).await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;
    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    let job = job(&db, &active, d("100")).await;

    // Both payers read the job while it is still unpaid.
    let seen_by_first = reload_job(&db, job.id).await;
    let seen_by_second = reload_job(&db, job.id).await;
    assert!(!seen_by_first.paid && !seen_by_second.paid);

    let first = db.begin().await.unwrap();
    assert!(job_db::claim_unpaid_job(&first, job.id, Utc::now()).await.unwrap());
    first.commit().await.unwrap();

    // The second payer still holds an unpaid copy, but the claim fails.
    let second = db.begin().await.unwrap();
    assert!(!job_db::claim_unpaid_job(&second, job.id, Utc::now()).await.unwrap());
    second.rollback().await.unwrap();
}

#[tokio::test]
async fn claim_rolled_back_with_its_transaction_can_be_retried() {
    let db = setup_db().await;
    let client = client(&db, "Alice", d("500")).await;
    let contractor = contractor(&db, "Bob", "Plumber", Decimal::ZERO).await;
    let active = contract(&db, &client, &contractor, Status::InProgress).await;
    let job = job(&db, &active, d("100")).await;

    let abandoned = db.begin().await.unwrap();
    assert!(job_db::claim_unpaid_job(&abandoned, job.id, Utc::now()).await.unwrap());
    abandoned.rollback().await.unwrap();

    assert!(!reload_job(&db, job.id).await.paid);
    settlement::pay_for_job(&db, &client, job.id).await.unwrap();
    assert_eq!(balance_of(&db, client.id).await, d("400"));
}
