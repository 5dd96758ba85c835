//! Trip input validation.
//!
//! Turns the raw destination/date strings a user typed into a [`TripQuery`],
//! or the first rule they break.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Forecasts are only available for today plus the next six days.
pub const MAX_DAY_OFFSET: u32 = 6;

/// A validated trip request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripQuery {
    pub destination_name: String,
    pub arrival_date: NaiveDate,
    /// Whole days from today to the arrival date, 0 = today.
    pub day_offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Blank destination entered")]
    EmptyDestination,

    #[error("Blank or invalid arrival date entered: {0:?}")]
    InvalidDate(String),

    #[error("The arrival date {0} is in the past")]
    PastDate(NaiveDate),

    #[error("The arrival date {0} is more than 6 days in the future")]
    TooFarFuture(NaiveDate),
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::EmptyDestination => {
                "Blank destination entered. Please enter a valid destination name and then try again."
            }
            ValidationError::InvalidDate(_) => {
                "Blank or invalid arrival date entered. Please enter a valid arrival date and then try again."
            }
            ValidationError::PastDate(_) => {
                "The arrival date entered is in the past. Please enter a present or future-dated arrival date and then try again."
            }
            ValidationError::TooFarFuture(_) => {
                "The arrival date entered is more than 7 days in the future. We can only provide weather forecasts for 7 days from the present date."
            }
        }
    }
}

/// Parse the arrival date as typed into a date input.
///
/// Accepts `YYYY-MM-DD`, or a full RFC 3339 timestamp reduced to its date.
pub fn parse_arrival_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Calendar days from `today` to `arrival`; negative for past dates.
pub fn day_offset(today: NaiveDate, arrival: NaiveDate) -> i64 {
    (arrival - today).num_days()
}

/// Validate raw trip input against `today`. First failing rule wins.
pub fn validate(
    destination_name: &str,
    arrival_date_text: &str,
    today: NaiveDate,
) -> Result<TripQuery, ValidationError> {
    let destination_name = destination_name.trim();
    if destination_name.is_empty() {
        return Err(ValidationError::EmptyDestination);
    }

    let arrival_date = parse_arrival_date(arrival_date_text)
        .ok_or_else(|| ValidationError::InvalidDate(arrival_date_text.to_string()))?;

    let offset = day_offset(today, arrival_date);
    if offset < 0 {
        return Err(ValidationError::PastDate(arrival_date));
    }
    if offset > i64::from(MAX_DAY_OFFSET) {
        return Err(ValidationError::TooFarFuture(arrival_date));
    }

    Ok(TripQuery {
        destination_name: destination_name.to_string(),
        arrival_date,
        day_offset: offset as u32,
    })
}
