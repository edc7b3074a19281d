//! Field-level validation shared by the server (authoritative) and the
//! terminal form surface (immediate feedback).

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::FieldType;
use crate::schema::FormField;

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_PHONE: &str = "Please enter a valid phone number";

#[allow(clippy::expect_used)]
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[allow(clippy::expect_used)]
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\-().]{7,20}$").expect("phone pattern compiles"));

/// Submitted values keyed by field id.
pub type FormData = BTreeMap<String, String>;

/// One rejected field, in the order the schema declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Checks `record` against `fields`, collecting every failure.
///
/// Absent keys count as empty values. Keys in `record` that no field declares
/// are ignored.
pub fn validate(fields: &[FormField], record: &FormData) -> Vec<FieldError> {
    fields
        .iter()
        .filter_map(|field| {
            let value = record.get(&field.id).map_or("", String::as_str);
            check_field(field, value).map(|message| FieldError {
                field: field.id.clone(),
                message,
            })
        })
        .collect()
}

/// Message for the first rule `value` breaks, if any.
pub fn check_field(field: &FormField, value: &str) -> Option<String> {
    if field.required && value.trim().is_empty() {
        return Some(format!("{} is required", field.label));
    }
    if value.is_empty() {
        return None;
    }

    match field.field_type {
        FieldType::Email if !is_valid_email(value) => Some(INVALID_EMAIL.to_string()),
        FieldType::Phone if !is_valid_phone(value) => Some(INVALID_PHONE.to_string()),
        FieldType::Email
        | FieldType::Phone
        | FieldType::Text
        | FieldType::Textarea
        | FieldType::Select
        | FieldType::Checkbox
        | FieldType::Multiselect
        | FieldType::Number
        | FieldType::Date => None,
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// 7 to 20 characters of digits and `+-().` once whitespace is removed.
pub fn is_valid_phone(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_PATTERN.is_match(&compact)
}

/// Groups the digits typed so far as `(XXX) XXX-XXXX`.
///
/// Display convenience for 10-digit NANP numbers only; anything past the
/// tenth digit is dropped, and validation never depends on this shape.
pub fn format_phone(value: &str) -> String {
    let digits: String = value.chars().filter(char::is_ascii_digit).take(10).collect();
    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}
