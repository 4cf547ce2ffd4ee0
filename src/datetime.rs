//! The single date-time format shared by the database layer and the JSON API.
//!
//! Timestamps are local wall-clock values (no offset), stored as TEXT in
//! SQLite and exchanged as ISO-8601 strings. Keeping one format means the
//! stored strings sort lexicographically in date order, which the range
//! queries rely on.

use rusqlite::types::Type;
use time::{
    Date, PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

/// `2024-01-15T18:30:00`
pub const FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// `2024-01-15`, used for plain-date query parameters.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Format a date-time for storage or serialization.
///
/// Sub-second precision is intentionally dropped.
pub fn format(datetime: PrimitiveDateTime) -> String {
    datetime
        .format(FORMAT)
        .expect("formatting a date-time with the crate format cannot fail")
}

/// Parse a date-time previously produced by [format].
pub fn parse(text: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(text, FORMAT)
}

/// Parse a plain date such as "2024-01-15".
pub fn parse_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text, DATE_FORMAT)
}

/// Read a TEXT column as a [PrimitiveDateTime].
pub fn map_column(row: &rusqlite::Row, index: usize) -> Result<PrimitiveDateTime, rusqlite::Error> {
    let text: String = row.get(index)?;

    parse(&text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

/// Serde adapter for [PrimitiveDateTime] fields using the crate format.
pub mod iso {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use time::PrimitiveDateTime;

    /// Serialize a date-time as an ISO-8601 string.
    pub fn serialize<S>(datetime: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format(*datetime))
    }

    /// Deserialize a date-time from an ISO-8601 string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<PrimitiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse(&text).map_err(D::Error::custom)
    }
}
