use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::models::form::{BookingForm, FieldKind};

// Name of the field carrying the submission timestamp
pub const TIMESTAMP_FIELD: &str = "_date";

/// Field values collected for one submit attempt.
///
/// Every named control contributes one entry, in form order, followed by the
/// `_date` timestamp. Unchecked checkboxes are left out. The value is discarded once the request has been sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSubmission {
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn collect(form: &BookingForm, submitted_at: DateTime<Utc>) -> Self {
        let mut fields: Vec<(String, String)> = form
            .fields()
            .filter(|field| !field.name.is_empty())
            .filter(|field| !(field.kind == FieldKind::Checkbox && field.value.is_empty()))
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect();

        fields.push((
            TIMESTAMP_FIELD.to_string(),
            submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ));

        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.get(TIMESTAMP_FIELD)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
