//! Financial year derivation
//!
//! An invoice belongs to the financial year labeled `YYYY-YY`, derived from
//! the calendar year of its date: a 2023 invoice falls in `"2023-24"`. The
//! second half is the next calendar year modulo 100, zero-padded, so the
//! century rollover yields `"1999-00"`.

use chrono::{Datelike, NaiveDate};

/// Derive the financial year label for an invoice date.
///
/// Pure function with no error cases: any valid date maps to a label.
pub fn financial_year(date: NaiveDate) -> String {
    let year = date.year();
    format!("{}-{:02}", year, (year + 1).rem_euclid(100))
}
