use chrono::{DateTime, Duration, DurationRound, Locale, Utc};

use crate::errors::CustomError;

/// Hours before the appointment during which cancellation is no longer allowed.
pub const CANCELLATION_WINDOW_HOURS: i64 = 2;

/// Truncates a date to the start of its hour. Booking slots are keyed by
/// hour start, whatever minute the client sent.
pub fn start_of_hour(date: DateTime<Utc>) -> Result<DateTime<Utc>, CustomError> {
    date.duration_trunc(Duration::hours(1))
        .map_err(|_| CustomError::InternalError)
}

pub fn is_within_cancellation_window(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    date - Duration::hours(CANCELLATION_WINDOW_HOURS) < now
}

/// "dia 08 de janeiro, às 14:00h" — the format every user-facing message
/// and email uses.
pub fn format_pt(date: DateTime<Utc>) -> String {
    date.format_localized("dia %d de %B, às %H:%Mh", Locale::pt_BR)
        .to_string()
}
