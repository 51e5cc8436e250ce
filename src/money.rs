//! Money and payment-date input handling.
//!
//! Amounts travel as [`Decimal`] and are stored as integer cents. Form input
//! may use the Brazilian layout (`1.234,56`, optionally prefixed with `R$`) or
//! a plain dot decimal (`1234.56`).

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::error::{AppError, AppResult};

pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn decimal_to_cents(amount: Decimal) -> AppResult<i64> {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| AppError::invalid("amount is too large"))
}

/// Parse a money field. Blank input means "not supplied".
pub fn parse_money(raw: &str) -> AppResult<Option<Decimal>> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("R$")
        .map(str::trim_start)
        .unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Ok(None);
    }

    let cleaned: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    let normalized = if cleaned.contains(',') {
        // Comma is the decimal separator, dots group thousands.
        if cleaned.matches(',').count() > 1 {
            return Err(AppError::invalid(format!("invalid amount '{raw}'")));
        }
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    let amount = Decimal::from_str(&normalized)
        .map_err(|_| AppError::invalid(format!("invalid amount '{raw}'")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::invalid("amounts cannot be negative"));
    }
    Ok(Some(
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    ))
}

/// Parse an optional money field straight to cents.
pub fn parse_money_cents(raw: Option<&str>) -> AppResult<Option<i64>> {
    match raw {
        Some(raw) => parse_money(raw)?.map(decimal_to_cents).transpose(),
        None => Ok(None),
    }
}

/// Accepts `YYYY-MM-DD` (HTML date inputs) and `DD/MM/YYYY`.
pub fn parse_payment_date(raw: &str) -> AppResult<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map(Some)
        .map_err(|_| AppError::invalid(format!("invalid payment date '{raw}'")))
}

/// Amount still owed on an order; never negative when the customer overpaid.
pub fn outstanding_cents(budgeted_cents: i64, paid_cents: i64) -> i64 {
    budgeted_cents.saturating_sub(paid_cents).max(0)
}
