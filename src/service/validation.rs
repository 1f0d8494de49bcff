//! Field rules shared by the resource handlers.

use crate::error::AppError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

pub type Body = HashMap<String, Value>;

pub const MIN_PHONE_DIGITS: usize = 10;
pub const MIN_DOCTOR_PRICE: i64 = 100_000;

pub struct RequestValidator;

impl RequestValidator {
    /// First field that is absent, null or blank fails with `Missing field: <field>`.
    pub fn require(body: &Body, fields: &[&str]) -> Result<(), AppError> {
        for field in fields {
            if field_string(body, field).is_none() {
                return Err(AppError::Validation(format!("Missing field: {}", field)));
            }
        }
        Ok(())
    }
}

pub fn body_to_map(value: Value) -> Result<Body, AppError> {
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        Value::Null => Ok(Body::new()),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Trimmed text of a field; numbers and booleans are stringified, blanks count as absent.
pub fn field_string(body: &Body, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Positive integer identifier as stored in a field, e.g. `doctor_id`.
pub fn parse_ref_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|n| *n > 0)
}

/// Route identifier.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::BadRequest("ID is required !".into()));
    }
    parse_ref_id(raw).ok_or_else(|| AppError::BadRequest("Invalid ID format".into()))
}

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, s: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

/// Latin-script letters (Vietnamese diacritics included) and whitespace, with at least one letter.
pub fn is_vietnamese_name(s: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&RE, r"^[\p{Latin}\p{M}\s]+$", s) && s.chars().any(char::is_alphabetic)
}

/// `label` prefixes the format error, `short_label` the length error.
pub fn check_phone(phone: &str, label: &str, short_label: &str) -> Result<(), AppError> {
    if phone.is_empty() || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(format!(
            "{} is not a valid phone number. Please, try again !",
            label
        )));
    }
    if phone.len() < MIN_PHONE_DIGITS {
        return Err(AppError::Validation(format!(
            "{} has at least {} number !",
            short_label, MIN_PHONE_DIGITS
        )));
    }
    Ok(())
}

pub fn is_address(s: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&RE, r"^[\p{L}\p{M}\p{N}\s]+$", s)
}

/// `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// `YYYY-MM-DD` or `DD-MM-YYYY`.
pub fn parse_flexible_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    parse_date(s).or_else(|| NaiveDate::parse_from_str(s, "%d-%m-%Y").ok())
}

/// `YYYY-MM-DD HH:MM[:SS]`, space or `T` separated.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
}

/// `HH:MM` (24h), seconds tolerated.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

pub fn parse_gender(s: &str) -> Result<i16, AppError> {
    match s.trim() {
        "0" => Ok(0),
        "1" => Ok(1),
        _ => Err(AppError::Validation(
            "Gender is not valid. There are 2 values: 0 is female & 1 is men".into(),
        )),
    }
}

/// Whole-number consultation price of at least 100 000.
pub fn parse_price(s: &str) -> Result<i64, AppError> {
    let price = s
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation("This is not a valid price. Please, try again !".into()))?;
    if price < MIN_DOCTOR_PRICE {
        return Err(AppError::Validation("Price must greater than 100.000 !".into()));
    }
    Ok(price)
}

/// `0`/`1` (or `false`/`true`).
pub fn parse_active(s: &str) -> Result<bool, AppError> {
    match s.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(AppError::Validation(
            "Active is not valid. There are 2 values: 0 is deactivated & 1 is activated".into(),
        )),
    }
}
