//! Monetary amounts.
//!
//! Balances and prices are exact decimals stored as `DECIMAL(16, 2)`.
//! Anything the column would have to round or cannot hold is rejected up
//! front, so a stored amount always equals the amount the caller sent.

use rust_decimal::Decimal;

use crate::error::AppError;

/// Fractional digits kept by the `balance` and `price` columns.
pub const SCALE: u32 = 2;

/// Integer digits available in a `DECIMAL(16, 2)` column.
const INTEGER_DIGITS: u32 = 14;

fn representable(amount: Decimal) -> bool {
    amount.normalize().scale() <= SCALE
        && amount.abs() < Decimal::from(10i64.pow(INTEGER_DIGITS))
}

/// Accept `amount` only if it is strictly positive and storable as-is.
pub fn require_positive(amount: Decimal, message: &str) -> Result<Decimal, AppError> {
    if amount > Decimal::ZERO && representable(amount) {
        Ok(amount)
    } else {
        Err(AppError::Validation(message.to_string()))
    }
}

/// Accept `amount` only if it is zero or positive and storable as-is.
pub fn require_non_negative(amount: Decimal, message: &str) -> Result<Decimal, AppError> {
    if amount >= Decimal::ZERO && representable(amount) {
        Ok(amount)
    } else {
        Err(AppError::Validation(message.to_string()))
    }
}
