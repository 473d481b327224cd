//! Date expression parsing for filter bounds.
//!
//! A bound can be an absolute RFC 3339 timestamp, a bare calendar date
//! (interpreted as midnight UTC), or a relative `"Nd"` expression meaning
//! N whole days before now.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::ConfigError;

/// Parses a date bound expression into an absolute UTC instant.
///
/// `None`, empty, or whitespace-only input means "no bound" and yields
/// `Ok(None)`. Anything that matches none of the accepted formats is a
/// configuration error. `"-5d"` is not a valid relative expression; the
/// day count must be a bare non-negative integer.
pub fn parse_date(text: Option<&str>) -> Result<Option<DateTime<Utc>>, ConfigError> {
    let Some(text) = text else {
        return Ok(None);
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Relative "Nd" form: N whole days before now, in UTC. Day counts that
    // overflow i64, the delta range, or the representable timestamp range
    // are rejected rather than allowed to panic inside chrono.
    if let Some(days) = trimmed.strip_suffix('d') {
        if !days.is_empty() && days.bytes().all(|b| b.is_ascii_digit()) {
            return days
                .parse::<i64>()
                .ok()
                .and_then(Duration::try_days)
                .and_then(|delta| Utc::now().checked_sub_signed(delta))
                .map(Some)
                .ok_or_else(|| ConfigError::InvalidDateFormat {
                    input: trimmed.to_string(),
                });
        }
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(midnight.and_utc()));
        }
    }

    Err(ConfigError::InvalidDateFormat {
        input: trimmed.to_string(),
    })
}

/// Validates that a before/after pair is chronologically consistent.
///
/// A valid pair requires `before >= after`: the upper bound of the window
/// must not precede the lower bound. Either side absent is always valid.
pub fn validate_range(
    before: Option<DateTime<Utc>>,
    after: Option<DateTime<Utc>>,
    label: &str,
) -> Result<(), ConfigError> {
    if let (Some(before), Some(after)) = (before, after) {
        if before < after {
            return Err(ConfigError::InvalidDateRange {
                label: label.to_string(),
                before,
                after,
            });
        }
    }
    Ok(())
}
