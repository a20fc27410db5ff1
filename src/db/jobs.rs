use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::contracts::{self, Status};
use crate::models::jobs::{self, CreateJob};
use crate::models::{money, profiles};

/// SQLite sums a `DECIMAL` column in binary floating point. Every stored
/// amount is whole cents, so rounding the total back to cents is exact.
fn whole_cents(total: Decimal) -> Decimal {
    total.round_dp(money::SCALE)
}

/// Insert a new, unpaid job.
pub async fn insert_job<C: ConnectionTrait>(db: &C, input: CreateJob) -> Result<jobs::Model, DbErr> {
    let new_job = jobs::ActiveModel {
        id: Set(Uuid::new_v4()),
        contract_id: Set(input.contract_id),
        description: Set(input.description),
        price: Set(input.price),
        paid: Set(false),
        payment_date: Set(None),
        created_at: Set(Utc::now()),
    };

    new_job.insert(db).await
}

/// Fetch a single job by ID.
pub async fn get_job_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<jobs::Model>, DbErr> {
    jobs::Entity::find_by_id(id).one(db).await
}

/// Fetch the jobs on contracts where `profile_id` is the client or the
/// contractor, optionally narrowed by contract status and paid flag.
pub async fn get_jobs_for_party<C: ConnectionTrait>(
    db: &C,
    profile_id: Uuid,
    status: Option<Status>,
    paid: Option<bool>,
) -> Result<Vec<jobs::Model>, DbErr> {
    let mut query = jobs::Entity::find()
        .inner_join(contracts::Entity)
        .filter(
            Condition::any()
                .add(contracts::Column::ClientId.eq(profile_id))
                .add(contracts::Column::ContractorId.eq(profile_id)),
        );

    if let Some(status) = status {
        query = query.filter(contracts::Column::Status.eq(status));
    }
    if let Some(paid) = paid {
        query = query.filter(jobs::Column::Paid.eq(paid));
    }

    query.order_by_asc(jobs::Column::CreatedAt).all(db).await
}

/// Number and total price of a client's unpaid jobs on in-progress contracts.
pub async fn get_unpaid_summary<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
) -> Result<(i64, Decimal), DbErr> {
    let row: Option<(i64, Option<Decimal>)> = jobs::Entity::find()
        .select_only()
        .column_as(Expr::col((jobs::Entity, jobs::Column::Id)).count(), "unpaid_jobs")
        .column_as(Expr::col((jobs::Entity, jobs::Column::Price)).sum(), "unpaid_total")
        .inner_join(contracts::Entity)
        .filter(contracts::Column::ClientId.eq(client_id))
        .filter(contracts::Column::Status.eq(Status::InProgress))
        .filter(jobs::Column::Paid.eq(false))
        .into_tuple()
        .one(db)
        .await?;

    Ok(match row {
        Some((count, total)) => (count, whole_cents(total.unwrap_or_default())),
        None => (0, Decimal::ZERO),
    })
}

/// Earnings per contractor profession for jobs paid within `[start, end]`,
/// highest first, ties by profession name.
pub async fn get_earnings_by_profession<C: ConnectionTrait>(
    db: &C,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    limit: u64,
) -> Result<Vec<(String, Decimal)>, DbErr> {
    let earned = Expr::col((jobs::Entity, jobs::Column::Price)).sum();

    jobs::Entity::find()
        .select_only()
        .column(profiles::Column::Profession)
        .column_as(earned.clone(), "earned")
        .join(JoinType::InnerJoin, jobs::Relation::Contract.def())
        .join(JoinType::InnerJoin, contracts::Relation::Contractor.def())
        .filter(jobs::Column::Paid.eq(true))
        .filter(jobs::Column::PaymentDate.between(start, end))
        .group_by(profiles::Column::Profession)
        .order_by_desc(earned)
        .order_by_asc(profiles::Column::Profession)
        .limit(limit)
        .into_tuple::<(String, Decimal)>()
        .all(db)
        .await
        .map(|rows| {
            rows.into_iter()
                .map(|(profession, earned)| (profession, whole_cents(earned)))
                .collect()
        })
}

/// Totals paid per client for jobs paid within `[start, end]`, highest
/// first, ties by first name, last name, then id.
pub async fn get_payments_by_client<C: ConnectionTrait>(
    db: &C,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    limit: u64,
) -> Result<Vec<(Uuid, String, String, Decimal)>, DbErr> {
    let paid = Expr::col((jobs::Entity, jobs::Column::Price)).sum();

    jobs::Entity::find()
        .select_only()
        .column(profiles::Column::Id)
        .column(profiles::Column::FirstName)
        .column(profiles::Column::LastName)
        .column_as(paid.clone(), "paid")
        .join(JoinType::InnerJoin, jobs::Relation::Contract.def())
        .join(JoinType::InnerJoin, contracts::Relation::Client.def())
        .filter(jobs::Column::Paid.eq(true))
        .filter(jobs::Column::PaymentDate.between(start, end))
        .group_by(profiles::Column::Id)
        .group_by(profiles::Column::FirstName)
        .group_by(profiles::Column::LastName)
        .order_by_desc(paid)
        .order_by_asc(profiles::Column::FirstName)
        .order_by_asc(profiles::Column::LastName)
        .order_by_asc(profiles::Column::Id)
        .limit(limit)
        .into_tuple::<(Uuid, String, String, Decimal)>()
        .all(db)
        .await
        .map(|rows| {
            rows.into_iter()
                .map(|(id, first_name, last_name, paid)| {
                    (id, first_name, last_name, whole_cents(paid))
                })
                .collect()
        })
}

/// Mark a job paid only if it is still unpaid.
///
/// Returns `false` when another payment got there first. On Postgres the
/// updated row stays locked until the surrounding transaction ends.
pub async fn claim_unpaid_job<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    paid_at: DateTime<Utc>,
) -> Result<bool, DbErr> {
    let result = jobs::Entity::update_many()
        .col_expr(jobs::Column::Paid, Expr::value(true))
        .col_expr(jobs::Column::PaymentDate, Expr::value(paid_at))
        .filter(jobs::Column::Id.eq(id))
        .filter(jobs::Column::Paid.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}
