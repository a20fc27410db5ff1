//! Read-only earnings reports over paid jobs in a payment-date window.
//!
//! Grouping, summing, ordering and limiting all happen in the database, so
//! a report costs one query however many jobs the window holds. Ranking is
//! deterministic: ties on the summed amount fall back to name order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use uuid::Uuid;

use crate::db::jobs as job_db;
use crate::error::AppError;

pub const DEFAULT_CLIENT_LIMIT: u64 = 2;

/// Inclusive `[start, end]` payment-date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

impl ReportWindow {
    /// Parse the `start`/`end` query values. A start after the end is
    /// accepted and simply matches nothing.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, AppError> {
        let (Some(start), Some(end)) = (
            start.filter(|s| !s.trim().is_empty()),
            end.filter(|s| !s.trim().is_empty()),
        ) else {
            return Err(AppError::Validation(
                "Start and end dates are required".into(),
            ));
        };

        let invalid = || AppError::Validation("Invalid date format".into());
        Ok(Self {
            start: parse_instant(start.trim(), Bound::Start).ok_or_else(invalid)?,
            end: parse_instant(end.trim(), Bound::End).ok_or_else(invalid)?,
        })
    }
}

fn parse_instant(raw: &str, bound: Bound) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    // A bare date covers the whole day on either side of the window.
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let naive = match bound {
        Bound::Start => date.and_hms_opt(0, 0, 0)?,
        Bound::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999)?,
    };
    Some(naive.and_utc())
}

/// Parse the optional `limit` query value (default 2, must be at least 1).
pub fn parse_limit(raw: Option<&str>) -> Result<u64, AppError> {
    match raw {
        None => Ok(DEFAULT_CLIENT_LIMIT),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(limit) if limit >= 1 => Ok(limit as u64),
            _ => Err(AppError::Validation("Invalid limit".into())),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessionEarnings {
    pub profession: String,
    pub earned: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientPayments {
    pub id: Uuid,
    pub full_name: String,
    pub paid: Decimal,
}

/// The contractor profession that earned the most in the window.
#[tracing::instrument(skip(db))]
pub async fn best_profession<C: ConnectionTrait>(
    db: &C,
    window: ReportWindow,
) -> Result<ProfessionEarnings, AppError> {
    job_db::get_earnings_by_profession(db, window.start, window.end, 1)
        .await?
        .into_iter()
        .next()
        .map(|(profession, earned)| ProfessionEarnings { profession, earned })
        .ok_or_else(|| AppError::NotFound("No paid jobs found in the date range".into()))
}

/// The `limit` clients who paid the most in the window.
#[tracing::instrument(skip(db))]
pub async fn best_clients<C: ConnectionTrait>(
    db: &C,
    window: ReportWindow,
    limit: u64,
) -> Result<Vec<ClientPayments>, AppError> {
    if limit < 1 {
        return Err(AppError::Validation("Invalid limit".into()));
    }

    let ranked: Vec<ClientPayments> =
        job_db::get_payments_by_client(db, window.start, window.end, limit)
            .await?
            .into_iter()
            .map(|(id, first_name, last_name, paid)| ClientPayments {
                id,
                full_name: format!("{first_name} {last_name}"),
                paid,
            })
            .collect();

    if ranked.is_empty() {
        return Err(AppError::NotFound(
            "No paid jobs found in the date range".into(),
        ));
    }

    Ok(ranked)
}
