//! Local wall-clock time for a configured canonical timezone.
//!
//! Every editability check and timestamp stamp depends on "now", so the
//! engines take the current date-time as an argument instead of reading the
//! system clock themselves. This module produces that value for the HTTP
//! layer; tests pass fixed date-times instead.

use time::{OffsetDateTime, PrimitiveDateTime};
use time_tz::OffsetDateTimeExt;

use crate::Error;

/// Get the current wall-clock date-time in `canonical_timezone`
/// (e.g. "Pacific/Auckland").
///
/// # Errors
/// Returns [Error::InvalidTimezone] if the name is not a canonical timezone.
pub fn local_now(canonical_timezone: &str) -> Result<PrimitiveDateTime, Error> {
    let timezone = time_tz::timezones::get_by_name(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))?;

    let now = OffsetDateTime::now_utc().to_timezone(timezone);

    Ok(PrimitiveDateTime::new(now.date(), now.time()))
}
