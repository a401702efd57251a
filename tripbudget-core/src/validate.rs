use thiserror::Error;

use crate::model::TripRequest;

/// Smallest accepted budget, in the base currency.
pub const MIN_BUDGET: f64 = 50.0;

/// Accepted trip duration range, in days (inclusive).
pub const MIN_DURATION_DAYS: u32 = 1;
pub const MAX_DURATION_DAYS: u32 = 730;

/// Fatal request errors. These are the only failures that abort a request;
/// the message text is surfaced to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Error: Destination must only contain letters and spaces.")]
    InvalidDestination,

    #[error("Error: Invalid number input.")]
    InvalidNumberFormat,

    #[error("Error: Budget must be at least ${MIN_BUDGET:.0}.")]
    BudgetTooLow,

    #[error("Error: Trip duration must be between {MIN_DURATION_DAYS} and {MAX_DURATION_DAYS} days.")]
    DurationOutOfRange,
}

/// Check the raw form fields and build a [`TripRequest`].
///
/// Pure and deterministic; no I/O happens here or anywhere before this
/// succeeds, so a rejected request never touches an external service.
pub fn validate(
    destination: &str,
    budget_raw: &str,
    duration_raw: &str,
) -> Result<TripRequest, ValidationError> {
    let compact: String = destination.chars().filter(|c| *c != ' ').collect();
    if compact.is_empty() || !compact.chars().all(char::is_alphabetic) {
        return Err(ValidationError::InvalidDestination);
    }

    let budget: f64 = budget_raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumberFormat)?;
    // Parsed signed so that "-1" reads as an integer out of range, not as a
    // malformed number.
    let duration: i64 = duration_raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumberFormat)?;

    // "inf" and "NaN" parse as valid f64s but are not usable amounts.
    if !budget.is_finite() {
        return Err(ValidationError::InvalidNumberFormat);
    }
    if budget < MIN_BUDGET {
        return Err(ValidationError::BudgetTooLow);
    }
    if !(i64::from(MIN_DURATION_DAYS)..=i64::from(MAX_DURATION_DAYS)).contains(&duration) {
        return Err(ValidationError::DurationOutOfRange);
    }
    let duration_days =
        u32::try_from(duration).map_err(|_| ValidationError::DurationOutOfRange)?;

    Ok(TripRequest { destination: destination.trim().to_string(), budget, duration_days })
}
