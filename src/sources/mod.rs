//! External collaborators of the reconciliation core.
//!
//! Row acquisition turns an export into [`RawRow`](crate::models::RawRow)s and
//! the holiday source supplies public holidays. Both run before any
//! aggregation starts; their output is immutable for the rest of the run.

mod csv_rows;
mod holidays;

pub use csv_rows::{read_csv, read_csv_file};
pub use holidays::{HolidayFile, HolidayProvider, NoHolidays, StaticHolidays, resolve_holidays};
