use thiserror::Error;

use crate::services::validation::ValidationIssue;

// Message shown in the banner for every failed submission
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "There was a problem submitting your booking. Please try again or contact us directly.";

/// One or more required/format rules are unmet.
///
/// Resolved locally: it only drives the invalid markers and the scroll to the
/// first invalid field, never the error banner.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} field(s) failed validation", .issues.len())]
pub struct ValidationError {
    pub issues: Vec<(String, ValidationIssue)>,
}

impl ValidationError {
    pub fn first_field(&self) -> Option<&str> {
        self.issues.first().map(|(name, _)| name.as_str())
    }
}

/// A submission that did not reach a 2xx response.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("form submission failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("form submission failed with status {0}")]
    Status(u16),
}

impl SubmissionError {
    // Both kinds surface the same message to the user
    pub fn user_message(&self) -> &'static str {
        SUBMISSION_FAILED_MESSAGE
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
