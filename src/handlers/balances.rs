use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::services::settlement;

/// POST /api/balances/deposit/{user_id}: top up a client's balance.
///
/// The deposit is capped at 25% of the client's outstanding unpaid jobs.
pub async fn deposit(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<DepositRequest>,
) -> Result<HttpResponse, AppError> {
    let client_id = path.into_inner();
    tracing::info!(depositor_id = %user.0.id, %client_id, amount = %body.amount, "deposit requested");

    let receipt = settlement::deposit(db.get_ref(), client_id, body.amount).await?;
    Ok(HttpResponse::Ok().json(receipt))
}

// ── Request DTOs ──

/// `amount` is checked by the settlement service.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DepositRequest {
    pub amount: Decimal,
}
