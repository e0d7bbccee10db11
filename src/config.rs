use dotenv::dotenv;
use std::env;
use std::time::Duration;
use tracing::info;

use crate::error::ConfigError;

pub const DEFAULT_SUBMIT_LABEL: &str = "Submit Booking";
pub const DEFAULT_PENDING_LABEL: &str = "Sending...";

// Labels of the submit control in its two states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitLabels {
    pub submit: String,
    pub pending: String,
}

impl Default for SubmitLabels {
    fn default() -> Self {
        Self {
            submit: DEFAULT_SUBMIT_LABEL.to_string(),
            pending: DEFAULT_PENDING_LABEL.to_string(),
        }
    }
}

/// Settings of the booking page, read from the environment.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub endpoint: String,
    pub request_timeout: Option<Duration>,
    pub labels: SubmitLabels,
}

impl BookingConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup("BOOKING_FORM_ENDPOINT")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing("BOOKING_FORM_ENDPOINT"))?;

        let request_timeout = match lookup("BOOKING_REQUEST_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| ConfigError::Invalid {
                        name: "BOOKING_REQUEST_TIMEOUT_SECS",
                        value: value.clone(),
                    })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let defaults = SubmitLabels::default();
        let labels = SubmitLabels {
            submit: lookup("BOOKING_SUBMIT_LABEL").unwrap_or(defaults.submit),
            pending: lookup("BOOKING_PENDING_LABEL").unwrap_or(defaults.pending),
        };

        info!("Booking form posts to {}", endpoint);

        Ok(Self {
            endpoint,
            request_timeout,
            labels,
        })
    }
}
