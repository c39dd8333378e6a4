// ==========================================
// Porter Rota - Row conversion helpers
// ==========================================
// Dates are stored as YYYY-MM-DD text, enums as their `as_str` form.
// Conversion failures surface as rusqlite FromSqlConversionFailure so they
// flow through `?` inside row-mapping closures.
// ==========================================

use chrono::NaiveDate;
use rusqlite::types::Type;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date_column(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn parse_optional_date_column(
    idx: usize,
    value: Option<String>,
) -> rusqlite::Result<Option<NaiveDate>> {
    value.map(|v| parse_date_column(idx, &v)).transpose()
}

pub fn parse_enum_column<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    value
        .parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

pub fn parse_optional_enum_column<T>(
    idx: usize,
    value: Option<String>,
) -> rusqlite::Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    value.map(|v| parse_enum_column(idx, &v)).transpose()
}
