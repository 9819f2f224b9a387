//! Field normalisation: the canonical attribute set derived from a raw POS
//! customer before it is compared against a stored subscriber.
//!
//! All functions here are pure. The only fallible one is
//! [`most_recent_date`]; everything else accepts arbitrary input.

use chrono::{DateTime, NaiveDate};
use chrono_tz::America::New_York;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::contract::Customer;

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").unwrap());

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The attributes a sync writes to (and reads back from) a subscriber.
/// Derived fresh per customer, never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalisedAttributes {
    /// `YYYY-MM-DD` in Eastern time, or empty for "never visited".
    pub last_visit: String,
    pub zip_code: String,
    /// Digit-only string of length 0-10.
    pub phone: String,
}

impl NormalisedAttributes {
    /// Derive the attribute set from a raw customer record. Only the first
    /// phone number and first address are consulted.
    pub fn from_customer(customer: &Customer) -> Self {
        let phone = customer
            .phone_numbers
            .first()
            .map(|raw| clean_phone(raw))
            .unwrap_or_default();
        let zip_code = customer
            .addresses
            .first()
            .map(|a| a.zip_code.clone())
            .unwrap_or_default();
        NormalisedAttributes {
            last_visit: last_visit_date(customer.last_visit_date),
            zip_code,
            phone,
        }
    }

    /// Render as the JSON attribute map stored on the subscriber.
    pub fn to_attribs(&self) -> Map<String, Value> {
        let mut attribs = Map::new();
        attribs.insert("lastVisit".into(), Value::String(self.last_visit.clone()));
        attribs.insert("zipCode".into(), Value::String(self.zip_code.clone()));
        attribs.insert("phone".into(), Value::String(self.phone.clone()));
        attribs
    }
}

/// Strip every non-digit; if more than ten digits remain, keep the last ten
/// (drops leading country-code digits).
pub fn clean_phone(raw: &str) -> String {
    let digits = NON_DIGIT.replace_all(raw, "").into_owned();
    if digits.len() > 10 {
        // All-ASCII digits, so byte slicing is safe.
        digits[digits.len() - 10..].to_string()
    } else {
        digits
    }
}

/// `first + " " + last`, trimmed at the ends only.
pub fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first, last).trim().to_string()
}

/// Remove all spaces and commas. No syntax validation happens here; the
/// mailing-list service rejects malformed addresses at create time.
pub fn clean_email(raw: &str) -> String {
    raw.replace(' ', "").replace(',', "")
}

/// Convert a millisecond epoch timestamp to a `YYYY-MM-DD` date in the
/// America/New_York civil calendar (DST-aware, not a UTC truncation).
/// A timestamp of exactly 0 is the "never visited" sentinel and yields an
/// empty string.
pub fn last_visit_date(epoch_millis: i64) -> String {
    if epoch_millis == 0 {
        return String::new();
    }
    match DateTime::from_timestamp(epoch_millis / 1000, 0) {
        Some(instant) => instant
            .with_timezone(&New_York)
            .format(DATE_FORMAT)
            .to_string(),
        None => String::new(),
    }
}

/// A date string that failed to parse as `YYYY-MM-DD`.
#[derive(Debug, thiserror::Error)]
#[error("failed to parse date {input:?}: {source}")]
pub struct DateParseError {
    pub input: String,
    #[source]
    pub source: chrono::ParseError,
}

/// Return whichever input corresponds to the chronologically later calendar
/// date; equal dates return the second argument. Either argument failing to
/// parse is an error for the caller to handle.
pub fn most_recent_date<'a>(first: &'a str, second: &'a str) -> Result<&'a str, DateParseError> {
    let parse = |input: &str| {
        NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|source| DateParseError {
            input: input.to_string(),
            source,
        })
    };
    let first_date = parse(first)?;
    let second_date = parse(second)?;
    if first_date > second_date {
        Ok(first)
    } else {
        Ok(second)
    }
}
