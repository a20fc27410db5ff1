use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::middleware::{AuthenticatedUser, JwtSettings};
use crate::auth::{jwt, password};
use crate::db::profiles as profile_db;
use crate::error::AppError;
use crate::models::money;
use crate::models::profiles::{LoginRequest, NewProfile, ProfileResponse, SignupRequest};

/// POST /api/signup: create a client or contractor profile.
pub async fn signup(
    db: web::Data<DatabaseConnection>,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()
        .map_err(|e| AppError::Validation(format!("Missing required fields: {e}")))?;

    let balance = money::require_non_negative(
        body.balance.unwrap_or_default(),
        "balance must be a non-negative amount with at most two decimal places",
    )?;

    if profile_db::get_profile_by_username(db.get_ref(), &body.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let plain = body.password;
    let password_hash = web::block(move || password::hash(&plain))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::Internal)?;

    let profile = profile_db::insert_profile(
        db.get_ref(),
        NewProfile {
            first_name: body.first_name,
            last_name: body.last_name,
            profession: body.profession,
            balance,
            kind: body.kind,
            username: body.username,
            password_hash,
        },
    )
    .await
    .map_err(|e| AppError::from_insert(e, "Username already exists"))?;

    tracing::info!(profile_id = %profile.id, kind = ?profile.kind, "profile created");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User created successfully",
        "id": profile.id,
    })))
}

/// POST /api/login: exchange username and password for a bearer token.
pub async fn login(
    db: web::Data<DatabaseConnection>,
    settings: web::Data<JwtSettings>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let invalid = || AppError::Unauthorized("Invalid credentials".into());

    let profile = profile_db::get_profile_by_username(db.get_ref(), &body.username)
        .await?
        .ok_or_else(invalid)?;

    let plain = body.password;
    let stored = profile.password_hash.clone();
    let valid = web::block(move || password::verify(&plain, &stored))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::Internal)?;

    if !valid {
        return Err(invalid());
    }

    let token = jwt::create_token(profile.id, profile.kind, &settings.secret, settings.ttl_secs)
        .map_err(AppError::Internal)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "token": token })))
}

/// GET /api/profile: return the currently authenticated profile.
pub async fn profile(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(ProfileResponse::from(user.0))
}
