use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Semantic type of a form control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Date,
    Select,
    Checkbox,
    Hidden,
    TextArea,
}

/// A single named control of the booking form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(default)]
    pub value: String,
    // Earliest accepted value for date controls
    #[serde(default)]
    pub min_date: Option<NaiveDate>,
    #[serde(skip)]
    pub invalid: bool,
    #[serde(skip)]
    pub has_value: bool,
}

impl Field {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            value: String::new(),
            min_date: None,
            invalid: false,
            has_value: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_min_date(mut self, min_date: NaiveDate) -> Self {
        self.min_date = Some(min_date);
        self
    }

    /// Checkbox controls submit "on" when checked and nothing otherwise.
    pub fn set_checked(&mut self, checked: bool) {
        self.value = if checked { "on".to_string() } else { String::new() };
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    // Equivalent of form.reset() for one control
    pub fn clear(&mut self) {
        self.value.clear();
        self.invalid = false;
        self.has_value = false;
    }
}

// One screen of fields, identified by its 1-based data-step index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormStep {
    pub index: usize,
    pub title: String,
    pub fields: Vec<Field>,
}

impl FormStep {
    pub fn new(index: usize, title: &str, fields: Vec<Field>) -> Self {
        Self {
            index,
            title: title.to_string(),
            fields,
        }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| field.required)
    }
}

/// The booking form: ordered steps and the endpoint it posts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingForm {
    pub action: String,
    pub steps: Vec<FormStep>,
}

impl BookingForm {
    pub fn new(action: &str, steps: Vec<FormStep>) -> Self {
        Self {
            action: action.to_string(),
            steps,
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&FormStep> {
        self.steps.iter().find(|step| step.index == index)
    }

    pub fn step_mut(&mut self, index: usize) -> Option<&mut FormStep> {
        self.steps.iter_mut().find(|step| step.index == index)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.steps.iter().flat_map(|step| step.fields.iter())
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.steps.iter_mut().flat_map(|step| step.fields.iter_mut())
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().find(|field| field.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields_mut().find(|field| field.name == name)
    }

    pub fn invalid_field_names(&self) -> Vec<String> {
        self.fields()
            .filter(|field| field.invalid)
            .map(|field| field.name.clone())
            .collect()
    }

    pub fn reset(&mut self) {
        for field in self.fields_mut() {
            field.clear();
        }
    }
}

/// The standard three-step booking page: contact details, session details, confirmation.
pub fn standard_booking_form(action: &str, min_date: NaiveDate) -> BookingForm {
    BookingForm::new(
        action,
        vec![
            FormStep::new(
                1,
                "Your Details",
                vec![
                    Field::new("name", "Full Name", FieldKind::Text).required(),
                    Field::new("email", "Email Address", FieldKind::Email).required(),
                    Field::new("phone", "Phone Number", FieldKind::Tel).required(),
                ],
            ),
            FormStep::new(
                2,
                "Session Details",
                vec![
                    Field::new("sessionType", "Session Type", FieldKind::Hidden).required(),
                    Field::new("preferredDate", "Preferred Date", FieldKind::Date)
                        .required()
                        .with_min_date(min_date),
                    Field::new("preferredTime", "Preferred Time", FieldKind::Select).required(),
                ],
            ),
            FormStep::new(
                3,
                "Confirm",
                vec![
                    Field::new("message", "Additional Information", FieldKind::TextArea),
                    Field::new("privacyPolicy", "Privacy Policy", FieldKind::Checkbox).required(),
                ],
            ),
        ],
    )
}
