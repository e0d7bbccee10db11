use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::SubmissionError;
use crate::models::submission::FormSubmission;

/// Target of the booking POST.
///
/// Any 2xx response counts as success; the body is never read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingEndpoint: Send + Sync {
    async fn submit(&self, action: &str, submission: &FormSubmission) -> Result<(), SubmissionError>;
}

/// Client posting bookings as multipart form data
pub struct HttpBookingEndpoint {
    client: Client,
}

impl HttpBookingEndpoint {
    /// Create a client; without a timeout the transport default applies
    pub fn new(timeout: Option<Duration>) -> Result<Self, SubmissionError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    fn multipart_body(submission: &FormSubmission) -> multipart::Form {
        submission
            .fields
            .iter()
            .fold(multipart::Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            })
    }
}

#[async_trait]
impl BookingEndpoint for HttpBookingEndpoint {
    async fn submit(&self, action: &str, submission: &FormSubmission) -> Result<(), SubmissionError> {
        info!("Submitting booking with {} fields", submission.len());
        debug!("Form action: {}", action);

        let res = self
            .client
            .post(action)
            .header(ACCEPT, "application/json")
            .multipart(Self::multipart_body(submission))
            .send()
            .await?;

        let status = res.status();
        info!("Response received with status: {}", status);

        if status.is_success() {
            Ok(())
        } else {
            Err(SubmissionError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;
