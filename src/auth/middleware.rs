use actix_web::FromRequest;
use actix_web::{HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt;
use crate::db::profiles::get_profile_by_id;
use crate::error::AppError;
use crate::models::profiles;

/// The profile behind a valid bearer token, freshly loaded for this request.
pub struct AuthenticatedUser(pub profiles::Model);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| AppError::Unauthorized("Authorization header missing".into()))?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                AppError::Unauthorized("Authorization header must be: Bearer <token>".into())
            })?;

            // 2. Validate the JWT with the shared secret.
            let settings = req
                .app_data::<web::Data<JwtSettings>>()
                .ok_or_else(|| AppError::Internal("JWT settings not configured".into()))?;

            let claims = jwt::validate_token(token, &settings.secret).map_err(|e| {
                tracing::debug!("rejected bearer token: {e}");
                AppError::Unauthorized("Invalid token".into())
            })?;

            let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

            // 3. Load the profile; balances are never taken from the token.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| AppError::Internal("Database not configured".into()))?;

            let profile = get_profile_by_id(db.get_ref(), user_id)
                .await?
                .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

            if profile.kind != claims.role {
                return Err(AppError::Unauthorized(
                    "Token role does not match profile".into(),
                ));
            }

            Ok(AuthenticatedUser(profile))
        })
    }
}

/// Signing settings for issued tokens, stored in Actix app data.
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub ttl_secs: i64,
}
