#![allow(dead_code)]

use chrono::{DateTime, Utc};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

use marketplace_backend::db::{contracts as contract_db, jobs as job_db, profiles as profile_db};
use marketplace_backend::models::contracts::{self, CreateContract, Status};
use marketplace_backend::models::jobs::{self, CreateJob};
use marketplace_backend::models::profiles::{self, NewProfile, ProfileType};

pub const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

/// Parse a literal amount, e.g. `d("12.50")`.
pub fn d(raw: &str) -> Decimal {
    raw.parse().expect("Invalid decimal literal")
}

/// Fresh in-memory SQLite database with the real migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    // Each pooled connection would otherwise see its own empty database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn profile(
    db: &DatabaseConnection,
    kind: ProfileType,
    first_name: &str,
    profession: &str,
    balance: Decimal,
) -> profiles::Model {
    profile_db::insert_profile(
        db,
        NewProfile {
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            profession: profession.to_string(),
            balance,
            kind,
            username: format!("{first_name}-{}", Uuid::new_v4()),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .expect("Failed to insert profile")
}

pub async fn client(db: &DatabaseConnection, name: &str, balance: Decimal) -> profiles::Model {
    profile(db, ProfileType::Client, name, "", balance).await
}

pub async fn contractor(
    db: &DatabaseConnection,
    name: &str,
    profession: &str,
    balance: Decimal,
) -> profiles::Model {
    profile(db, ProfileType::Contractor, name, profession, balance).await
}

pub async fn contract(
    db: &DatabaseConnection,
    client: &profiles::Model,
    contractor: &profiles::Model,
    status: Status,
) -> contracts::Model {
    contract_db::insert_contract(
        db,
        CreateContract {
            client_id: client.id,
            contractor_id: contractor.id,
            terms: "Fix everything".to_string(),
            status,
        },
    )
    .await
    .expect("Failed to insert contract")
}

pub async fn job(
    db: &DatabaseConnection,
    contract: &contracts::Model,
    price: Decimal,
) -> jobs::Model {
    job_db::insert_job(
        db,
        CreateJob {
            contract_id: contract.id,
            description: "Some work".to_string(),
            price,
        },
    )
    .await
    .expect("Failed to insert job")
}

/// Insert a job and mark it paid at `paid_at` without moving any money.
pub async fn paid_job(
    db: &DatabaseConnection,
    contract: &contracts::Model,
    price: Decimal,
    paid_at: DateTime<Utc>,
) -> jobs::Model {
    let job = job(db, contract, price).await;
    assert!(
        job_db::claim_unpaid_job(db, job.id, paid_at)
            .await
            .expect("Failed to mark job paid")
    );
    job_db::get_job_by_id(db, job.id)
        .await
        .expect("Failed to reload job")
        .expect("Job vanished")
}

pub async fn balance_of(db: &DatabaseConnection, id: Uuid) -> Decimal {
    profile_db::get_profile_by_id(db, id)
        .await
        .expect("Failed to load profile")
        .expect("Profile missing")
        .balance
}

pub async fn reload_job(db: &DatabaseConnection, id: Uuid) -> jobs::Model {
    job_db::get_job_by_id(db, id)
        .await
        .expect("Failed to load job")
        .expect("Job missing")
}
