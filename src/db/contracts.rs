use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::contracts::{self, CreateContract, Status};

/// Insert a new contract.
pub async fn insert_contract<C: ConnectionTrait>(
    db: &C,
    input: CreateContract,
) -> Result<contracts::Model, DbErr> {
    let new_contract = contracts::ActiveModel {
        id: Set(Uuid::new_v4()),
        terms: Set(input.terms),
        status: Set(input.status),
        client_id: Set(input.client_id),
        contractor_id: Set(input.contractor_id),
        created_at: Set(chrono::Utc::now()),
    };

    new_contract.insert(db).await
}

/// Fetch a single contract by ID.
pub async fn get_contract_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find_by_id(id).one(db).await
}

/// Fetch contracts where the profile is either party, optionally filtered by status.
pub async fn get_contracts_for_party<C: ConnectionTrait>(
    db: &C,
    profile_id: Uuid,
    status: Option<Status>,
) -> Result<Vec<contracts::Model>, DbErr> {
    let mut query = contracts::Entity::find().filter(
        Condition::any()
            .add(contracts::Column::ClientId.eq(profile_id))
            .add(contracts::Column::ContractorId.eq(profile_id)),
    );

    if let Some(status) = status {
        query = query.filter(contracts::Column::Status.eq(status));
    }

    query
        .order_by_asc(contracts::Column::CreatedAt)
        .all(db)
        .await
}

/// Whether the client holds at least one contract in the given status.
pub async fn has_client_contract_in_status<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
    status: Status,
) -> Result<bool, DbErr> {
    let found = contracts::Entity::find()
        .filter(contracts::Column::ClientId.eq(client_id))
        .filter(contracts::Column::Status.eq(status))
        .one(db)
        .await?;

    Ok(found.is_some())
}

/// Move a contract from `from` to `to` only if it is still in `from`.
///
/// Returns `false` when a concurrent request changed the status first.
pub async fn transition_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    from: Status,
    to: Status,
) -> Result<bool, DbErr> {
    let result = contracts::Entity::update_many()
        .col_expr(contracts::Column::Status, Expr::value(to.into_value()))
        .filter(contracts::Column::Id.eq(id))
        .filter(contracts::Column::Status.eq(from))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}
