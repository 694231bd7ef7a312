//! Field splitting for the GRAL text inputs.

/// Separators accepted between fields of `meteopgt.all` and `mettimeseries.dat`.
pub const FIELD_SEPARATORS: [char; 4] = [' ', ',', '\t', ';'];

/// Separators accepted inside a date token (`dd.mm`, `dd-mm`, `dd:mm`).
pub const DATE_SEPARATORS: [char; 3] = ['.', ':', '-'];

/// Split a line into its non-empty fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(&FIELD_SEPARATORS[..])
        .filter(|field| !field.is_empty())
        .collect()
}

/// Split a date token into its non-empty parts.
pub fn split_date(token: &str) -> Vec<&str> {
    token
        .split(&DATE_SEPARATORS[..])
        .filter(|part| !part.is_empty())
        .collect()
}
