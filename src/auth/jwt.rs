use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::profiles::ProfileType;

/// Claims carried by the bearer tokens this service issues.
///
/// `sub` is the profile UUID and `role` its type at login time.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The profile UUID.
    pub sub: String,
    /// Client or Contractor.
    pub role: ProfileType,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: usize,
}

impl Claims {
    pub fn new(user_id: Uuid, role: ProfileType, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            role,
            exp: (now + ttl_secs) as usize,
            iat: now as usize,
        }
    }

    /// Extract the profile UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }
}

/// Sign a token for `user_id` with HS256 using the shared secret.
pub fn create_token(
    user_id: Uuid,
    role: ProfileType,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, String> {
    let claims = Claims::new(user_id, role, ttl_secs);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign token: {e}"))
}

/// Validate an HS256 token and return the decoded claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|td| td.claims)
    .map_err(|e| format!("Token validation failed: {e}"))
}
