use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::contracts as contract_db;
use crate::db::jobs as job_db;
use crate::error::AppError;
use crate::models::contracts::Status;
use crate::services::reporting::{self, ReportWindow};
use crate::services::settlement;

/// GET /api/jobs: every job across the caller's contracts.
pub async fn get_jobs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let contracts = contract_db::get_contracts_for_party(db.get_ref(), user.0.id, None).await?;
    if contracts.is_empty() {
        return Err(AppError::NotFound("No contracts found".into()));
    }

    let jobs = job_db::get_jobs_for_party(db.get_ref(), user.0.id, None, None).await?;
    if jobs.is_empty() {
        return Err(AppError::NotFound("No jobs found".into()));
    }

    Ok(HttpResponse::Ok().json(jobs))
}

/// GET /api/jobs/unpaid: unpaid jobs on the caller's in-progress contracts.
pub async fn get_unpaid_jobs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let contracts =
        contract_db::get_contracts_for_party(db.get_ref(), user.0.id, Some(Status::InProgress))
            .await?;
    if contracts.is_empty() {
        return Err(AppError::NotFound("No active contracts found".into()));
    }

    let jobs = job_db::get_jobs_for_party(
        db.get_ref(),
        user.0.id,
        Some(Status::InProgress),
        Some(false),
    )
    .await?;
    if jobs.is_empty() {
        return Err(AppError::NotFound("No unpaid jobs found".into()));
    }

    Ok(HttpResponse::Ok().json(jobs))
}

/// POST /api/jobs/{id}/pay: the contract's client settles a job.
pub async fn pay_for_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let receipt = settlement::pay_for_job(db.get_ref(), &user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(receipt))
}

/// GET /api/jobs/best-profession?start=&end=
pub async fn best_profession(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let window = ReportWindow::parse(query.start.as_deref(), query.end.as_deref())?;
    let best = reporting::best_profession(db.get_ref(), window).await?;
    Ok(HttpResponse::Ok().json(best))
}

/// GET /api/jobs/best-clients?start=&end=&limit=
pub async fn best_clients(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let window = ReportWindow::parse(query.start.as_deref(), query.end.as_deref())?;
    let limit = reporting::parse_limit(query.limit.as_deref())?;
    let best = reporting::best_clients(db.get_ref(), window, limit).await?;
    Ok(HttpResponse::Ok().json(best))
}

// ── Request DTOs ──

/// Query string shared by the reporting endpoints. Kept as raw strings so
/// parse failures produce the reporting-specific messages.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ReportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<String>,
}
