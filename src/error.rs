use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use rust_decimal::Decimal;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

/// Every failure a handler can surface, mapped onto an HTTP status.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Deposit amount cannot exceed 25% of unpaid jobs total ({cap})")]
    DepositLimitExceeded { cap: Decimal },

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("Job {0} is already paid")]
    AlreadyPaid(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
    pub fn from_insert(err: DbErr, conflict_message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict(conflict_message.to_string())
            }
            _ => AppError::Database(err),
        }
    }

    /// Business-rule rejections: the request was well formed but the
    /// current state of the ledger does not allow it.
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            AppError::InvalidState(_)
                | AppError::DepositLimitExceeded { .. }
                | AppError::InsufficientFunds { .. }
                | AppError::AlreadyPaid(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidState(_)
            | AppError::DepositLimitExceeded { .. }
            | AppError::InsufficientFunds { .. }
            | AppError::AlreadyPaid(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
            rejected if rejected.is_business_rule() => {
                tracing::warn!(error = %rejected, "request rejected by business rule");
                rejected.to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rule_errors_are_bad_requests() {
        let errors = [
            AppError::InvalidState("Client has no active contracts".into()),
            AppError::DepositLimitExceeded {
                cap: Decimal::new(2500, 2),
            },
            AppError::InsufficientFunds {
                required: Decimal::from(10),
                available: Decimal::from(5),
            },
            AppError::AlreadyPaid(Uuid::new_v4()),
        ];

        for err in errors {
            assert!(err.is_business_rule());
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn client_errors_are_not_business_rules() {
        assert!(!AppError::Validation("x".into()).is_business_rule());
        assert!(!AppError::NotFound("x".into()).is_business_rule());
        assert!(!AppError::Internal("x".into()).is_business_rule());
    }

    #[test]
    fn business_rule_rejections_keep_their_message() {
        let err = AppError::InvalidState("Client has no unpaid jobs".into());
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn deposit_limit_message_reports_the_cap() {
        let err = AppError::DepositLimitExceeded {
            cap: Decimal::new(3750, 2),
        };
        assert!(err.to_string().contains("(37.50)"));
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = AppError::Database(DbErr::Custom("connection refused on 10.0.0.3".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
    }
}
