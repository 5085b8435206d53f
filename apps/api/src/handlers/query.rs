//! Query-string parsing shared by list endpoints.
//!
//! Every parameter arrives as text so malformed input yields the JSON error
//! envelope instead of an extractor rejection. Blank values count as absent.

use std::borrow::Cow;
use std::fmt::Display;
use std::str::FromStr;

use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use backoffice_core::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Which end of a day a date-only bound resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DayBound {
    Start,
    End,
}

/// Unwraps the query extractor, turning a malformed query string
/// (a repeated key, for instance) into a validation error.
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| {
            AppError::Validation(format!("invalid query string: {}", rejection.body_text()))
        })
}

pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

pub(crate) fn parse_optional<T>(name: &str, value: Option<&str>) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    value
        .parse::<T>()
        .map(Some)
        .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}")))
}

/// Parses an RFC 3339 timestamp or a `YYYY-MM-DD` date.
///
/// A date-only bound covers the whole UTC day, so an upper bound of
/// `2025-03-01` still includes entries from that evening.
pub(crate) fn parse_date_bound(
    name: &str,
    value: Option<&str>,
    bound: DayBound,
) -> AppResult<Option<DateTime<Utc>>> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&restore_offset_sign(value)) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|error| {
        AppError::Validation(format!(
            "invalid {name} '{value}': expected YYYY-MM-DD or RFC 3339 ({error})"
        ))
    })?;

    let time = match bound {
        DayBound::Start => NaiveTime::MIN,
        DayBound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).ok_or_else(
            || AppError::Internal("end of day is not a valid time".to_owned()),
        )?,
    };

    Ok(Some(date.and_time(time).and_utc()))
}

/// Form decoding turns an unescaped `+` into a space, so `10:00:00+02:00`
/// arrives as `10:00:00 02:00`. Puts the sign back in the offset position.
fn restore_offset_sign(value: &str) -> Cow<'_, str> {
    let Some(sign_index) = value.len().checked_sub(6) else {
        return Cow::Borrowed(value);
    };
    if !value.is_char_boundary(sign_index) || !value[sign_index..].starts_with(' ') {
        return Cow::Borrowed(value);
    }

    Cow::Owned(format!("{}+{}", &value[..sign_index], &value[sign_index + 1..]))
}
