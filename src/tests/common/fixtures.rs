use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

use crate::models::form::{standard_booking_form, BookingForm};
use crate::models::lifecycle::SubmissionLifecycle;
use crate::services::dropdown::{session_type_dropdown, Dropdown};
use crate::view::{FormView, ScrollTarget, ViewFrame};

pub const TEST_ACTION: &str = "https://forms.example.com/book";

pub fn test_min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// The three-step booking form with every field empty
pub fn standard_form() -> BookingForm {
    standard_booking_form(TEST_ACTION, test_min_date())
}

/// Same form pointed at another endpoint
pub fn standard_form_for(action: &str) -> BookingForm {
    standard_booking_form(action, test_min_date())
}

/// The three-step form with valid values in every field
pub fn filled_standard_form() -> BookingForm {
    fill(standard_form())
}

pub fn fill(mut form: BookingForm) -> BookingForm {
    let values = [
        ("name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("phone", "+44 20 7946 0958"),
        ("sessionType", "portrait"),
        ("preferredDate", "2035-03-30"),
        ("preferredTime", "morning"),
        ("message", "Window light if possible"),
        ("privacyPolicy", "on"),
    ];
    for (name, value) in values {
        form.field_mut(name).unwrap().value = value.to_string();
    }
    form
}

pub fn session_dropdown() -> Dropdown {
    session_type_dropdown()
}

/// View that keeps every painted frame and scroll request
#[derive(Clone, Default)]
pub struct RecordingView {
    frames: Arc<Mutex<Vec<ViewFrame>>>,
    scrolls: Arc<Mutex<Vec<ScrollTarget>>>,
}

impl RecordingView {
    pub fn frames(&self) -> Vec<ViewFrame> {
        self.frames.lock().unwrap().clone()
    }

    pub fn last_frame(&self) -> Option<ViewFrame> {
        self.frames.lock().unwrap().last().cloned()
    }

    pub fn scrolls(&self) -> Vec<ScrollTarget> {
        self.scrolls.lock().unwrap().clone()
    }

    pub fn last_scroll(&self) -> Option<ScrollTarget> {
        self.scrolls.lock().unwrap().last().cloned()
    }

    /// Lifecycle states in the order they were painted, repeats collapsed
    pub fn lifecycle_history(&self) -> Vec<SubmissionLifecycle> {
        let mut history: Vec<SubmissionLifecycle> = Vec::new();
        for frame in self.frames.lock().unwrap().iter() {
            if history.last() != Some(&frame.lifecycle) {
                history.push(frame.lifecycle);
            }
        }
        history
    }
}

impl FormView for RecordingView {
    fn paint(&mut self, frame: &ViewFrame) {
        self.frames.lock().unwrap().push(frame.clone());
    }

    fn scroll_into_view(&mut self, target: &ScrollTarget) {
        self.scrolls.lock().unwrap().push(target.clone());
    }
}
