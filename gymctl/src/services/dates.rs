use chrono::NaiveDate;

use crate::errors::{Error, Result};
use crate::types::parse_date;

/// Validate a `dd-MM-yyyy` date, returning the parsed value.
pub fn validate_date(input: &str) -> Result<NaiveDate> {
    parse_date(input).map_err(|_| Error::BadRequest {
        message: format!("Invalid date '{input}', expected format dd-MM-yyyy"),
    })
}
