use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::handlers::events::FormEvent;
use crate::models::form::{BookingForm, FieldKind};
use crate::services::dropdown::Dropdown;

/// Field values prepared ahead of time, e.g. from a JSON file.
///
/// Strings are typed into fields, booleans tick checkboxes. A value for the
/// dropdown-bound field is picked through the dropdown when an option matches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct BookingDraft {
    pub values: HashMap<String, Value>,
}

impl BookingDraft {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Invalid {
            name: "draft",
            value: format!("{}: {}", path.display(), e),
        })?;

        Self::from_json(&json).map_err(|e| ConfigError::Invalid {
            name: "draft",
            value: format!("{}: {}", path.display(), e),
        })
    }

    /// The events a visitor would produce filling `form` step by step and submitting.
    pub fn events(&self, form: &BookingForm, dropdown: Option<&Dropdown>) -> Vec<FormEvent> {
        let mut events = Vec::new();

        for (position, step) in form.steps.iter().enumerate() {
            for field in &step.fields {
                let Some(value) = self.values.get(&field.name) else {
                    continue;
                };
                debug!("Draft value for '{}'", field.name);

                let bound = dropdown.filter(|dropdown| dropdown.field_name == field.name);
                match (value, field.kind, bound) {
                    (Value::Bool(checked), _, _) => events.push(FormEvent::Check {
                        name: field.name.clone(),
                        checked: *checked,
                    }),
                    (Value::String(text), _, Some(dropdown)) => {
                        match dropdown.options.iter().position(|option| option.value == *text) {
                            Some(index) => {
                                events.push(FormEvent::DropdownClick);
                                events.push(FormEvent::DropdownChoose(index));
                            }
                            None => warn!("'{}' is not an option of '{}'", text, field.name),
                        }
                    }
                    (Value::String(text), FieldKind::Select | FieldKind::Date, None) => {
                        events.push(FormEvent::Change {
                            name: field.name.clone(),
                            value: text.clone(),
                        })
                    }
                    (Value::String(text), _, None) => events.push(FormEvent::Input {
                        name: field.name.clone(),
                        value: text.clone(),
                    }),
                    (other, _, _) => warn!("Unsupported draft value for '{}': {}", field.name, other),
                }
            }

            if position + 1 < form.steps.len() {
                events.push(FormEvent::Next);
            }
        }

        events.push(FormEvent::Submit);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::fixtures::{session_dropdown, standard_form};
    use std::io::Write;

    #[test]
    fn test_events_follow_steps_and_end_with_submit() {
        let draft = BookingDraft::from_json(
            r#"{
                "name": "Ada Lovelace",
                "sessionType": "family",
                "preferredDate": "2035-03-30",
                "privacyPolicy": true
            }"#,
        )
        .unwrap();

        let dropdown = session_dropdown();
        let events = draft.events(&standard_form(), Some(&dropdown));

        assert_eq!(
            events,
            vec![
                FormEvent::Input {
                    name: "name".to_string(),
                    value: "Ada Lovelace".to_string()
                },
                FormEvent::Next,
                FormEvent::DropdownClick,
                FormEvent::DropdownChoose(1),
                FormEvent::Change {
                    name: "preferredDate".to_string(),
                    value: "2035-03-30".to_string()
                },
                FormEvent::Next,
                FormEvent::Check {
                    name: "privacyPolicy".to_string(),
                    checked: true
                },
                FormEvent::Submit,
            ]
        );
    }

    #[test]
    fn test_unknown_dropdown_value_is_skipped() {
        let draft = BookingDraft::from_json(r#"{"sessionType": "wedding"}"#).unwrap();
        let dropdown = session_dropdown();
        let events = draft.events(&standard_form(), Some(&dropdown));
        assert!(!events.contains(&FormEvent::DropdownClick));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"email": "ada@example.com"}}"#).unwrap();

        let draft = BookingDraft::from_path(file.path()).unwrap();
        assert_eq!(draft.values["email"], Value::String("ada@example.com".to_string()));

        let missing = BookingDraft::from_path(Path::new("/nonexistent/draft.json"));
        assert!(matches!(missing, Err(ConfigError::Invalid { name: "draft", .. })));
    }
}
