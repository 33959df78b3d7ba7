//! Common type definitions.
//!
//! This module defines:
//! - Type aliases for entity IDs (UserId, TraineeId, etc.)
//! - The wire date format shared by requests, responses and the seed file
//!
//! # ID Types
//!
//! All entity IDs are auto-incrementing integers assigned by the in-memory store:
//!
//! - [`UserId`]: User identity shared by trainees and trainers
//! - [`TraineeId`]: Trainee profile identifier
//! - [`TrainerId`]: Trainer profile identifier
//! - [`TrainingTypeId`]: Training type identifier
//! - [`TrainingId`]: Training session identifier
//!
//! # Dates
//!
//! Dates travel as `dd-MM-yyyy` strings (e.g. `12-12-2022`). Use [`dmy_date`] and
//! [`dmy_date_option`] as `#[serde(with = ...)]` helpers.

use chrono::NaiveDate;

// Type aliases for IDs
pub type UserId = i64;
pub type TraineeId = i64;
pub type TrainerId = i64;
pub type TrainingTypeId = i64;
pub type TrainingId = i64;

/// `chrono` format string for `dd-MM-yyyy`.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a `dd-MM-yyyy` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
}

/// Format a date as `dd-MM-yyyy`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde helpers for a required `dd-MM-yyyy` date.
pub mod dmy_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(|e| D::Error::custom(format!("invalid date '{raw}', expected dd-MM-yyyy: {e}")))
    }
}

/// Serde helpers for an optional `dd-MM-yyyy` date.
pub mod dmy_date_option {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_some(&super::format_date(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_date(value)
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid date '{value}', expected dd-MM-yyyy: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Dated {
        #[serde(with = "dmy_date")]
        date: NaiveDate,
        #[serde(default, with = "dmy_date_option")]
        maybe: Option<NaiveDate>,
    }

    #[test]
    fn test_date_wire_format() {
        let parsed: Dated = serde_json::from_str(r#"{"date": "01-02-2023", "maybe": "31-12-1999"}"#).unwrap();
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        assert_eq!(parsed.maybe, NaiveDate::from_ymd_opt(1999, 12, 31));

        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["date"], "01-02-2023");
        assert_eq!(json["maybe"], "31-12-1999");
    }

    #[test]
    fn test_missing_optional_date() {
        let parsed: Dated = serde_json::from_str(r#"{"date": "01-02-2023"}"#).unwrap();
        assert_eq!(parsed.maybe, None);
    }

    #[test]
    fn test_iso_dates_are_rejected() {
        assert!(serde_json::from_str::<Dated>(r#"{"date": "2023-02-01"}"#).is_err());
    }
}
