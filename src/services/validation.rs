use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::ValidationError;
use crate::models::form::{Field, FieldKind, FormStep};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,}$").expect("phone pattern compiles"));

// Why a single control failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationIssue {
    Missing,
    MalformedEmail,
    MalformedPhone,
    MalformedDate,
    DateBeforeMinimum,
}

impl ValidationIssue {
    pub fn message(&self, kind: FieldKind) -> &'static str {
        match (self, kind) {
            (ValidationIssue::Missing, FieldKind::Checkbox) => {
                "You must agree to the privacy policy to continue."
            }
            (ValidationIssue::Missing, _) => "This field is required.",
            (ValidationIssue::MalformedEmail, _) => "Please enter a valid email address.",
            (ValidationIssue::MalformedPhone, _) => "Please enter a valid phone number.",
            (ValidationIssue::MalformedDate, _) => "Please enter a valid date.",
            (ValidationIssue::DateBeforeMinimum, _) => "Please choose a date from today onwards.",
        }
    }
}

/// Email check: `local@domain.tld`, case-insensitive, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(&email.to_lowercase())
}

/// Phone check: optional leading `+`, then at least ten digits, spaces, dashes or parentheses.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

fn is_on_or_after(value: &str, min_date: NaiveDate) -> Result<bool, ValidationIssue> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationIssue::MalformedDate)?;
    Ok(date >= min_date)
}

/// Checks one control without touching its marker.
pub fn check_field(field: &Field) -> Option<ValidationIssue> {
    if field.is_blank() {
        return field.required.then_some(ValidationIssue::Missing);
    }

    match field.kind {
        FieldKind::Email if !is_valid_email(&field.value) => Some(ValidationIssue::MalformedEmail),
        FieldKind::Tel if !is_valid_phone(&field.value) => Some(ValidationIssue::MalformedPhone),
        FieldKind::Date => match field.min_date {
            Some(min_date) => match is_on_or_after(&field.value, min_date) {
                Ok(true) => None,
                Ok(false) => Some(ValidationIssue::DateBeforeMinimum),
                Err(issue) => Some(issue),
            },
            None => None,
        },
        _ => None,
    }
}

/// Validates one control and updates its invalid marker.
pub fn validate_field(field: &mut Field) -> bool {
    let issue = check_field(field);
    field.invalid = issue.is_some();

    if let Some(issue) = issue {
        debug!("Field '{}' is invalid: {:?}", field.name, issue);
    }

    issue.is_none()
}

/// Validates every required control of a step.
///
/// All required fields are visited, so every failing control gets its marker
/// even after the first failure.
pub fn validate_step_fields(step: &mut FormStep) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    for field in step.fields.iter_mut().filter(|field| field.required) {
        let issue = check_field(field);
        field.invalid = issue.is_some();

        if let Some(issue) = issue {
            issues.push((field.name.clone(), issue));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;
