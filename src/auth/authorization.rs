use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::db::contracts as contract_db;
use crate::error::AppError;
use crate::models::contracts::Model;
use crate::models::profiles;

pub fn require_client(profile: &profiles::Model, action: &str) -> Result<(), AppError> {
    if profile.is_client() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Only clients can {action}")))
    }
}

pub fn require_contractor(profile: &profiles::Model, action: &str) -> Result<(), AppError> {
    if profile.is_contractor() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Only contractors can {action}")))
    }
}

/// Load a contract and check that `user_id` is its client or contractor.
pub async fn verify_contract_party<C: ConnectionTrait>(
    db: &C,
    contract_id: Uuid,
    user_id: Uuid,
) -> Result<Model, AppError> {
    let contract = contract_db::get_contract_by_id(db, contract_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Contract {contract_id} not found")))?;

    if !contract.is_party(user_id) {
        return Err(AppError::Forbidden(
            "You can only access contracts you are involved in".into(),
        ));
    }

    Ok(contract)
}
