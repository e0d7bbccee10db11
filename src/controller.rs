//! Booking form controller.
//!
//! Owns the form state, validates input, gates step progression and drives the
//! submission lifecycle `Idle -> Submitting -> Success | Failed -> Idle`.
//! Visual sequencing (fades, delayed reveals, banner dismissal) is queued as
//! scheduled transitions which the driver drains with [`BookingController::run_due`].

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::client::BookingEndpoint;
use crate::config::SubmitLabels;
use crate::error::{SubmissionError, ValidationError};
use crate::models::form::{BookingForm, FieldKind};
use crate::models::lifecycle::SubmissionLifecycle;
use crate::models::submission::FormSubmission;
use crate::services::dropdown::{Dropdown, DropdownKey};
use crate::services::steps::StepMachine;
use crate::services::validation::{validate_field, validate_step_fields};
use crate::view::{render, FormView, PanelFrame, ScrollTarget, ViewFrame};

// Delay between the form fading out and the success panel appearing
pub const SUCCESS_REVEAL_DELAY: Duration = Duration::from_millis(500);
// Fade of the success panel on "book another"
pub const BOOK_ANOTHER_FADE: Duration = Duration::from_millis(300);
// Time an error banner stays before fading
pub const BANNER_LIFETIME: Duration = Duration::from_millis(5000);
// Banner fade before removal
pub const BANNER_FADE: Duration = Duration::from_millis(500);
// Visual confirmation after picking a dropdown option
pub const OPTION_CONFIRM: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub displayed: bool,
    pub opacity: f32,
    pub fade_ms: u64,
}

impl PanelState {
    fn shown() -> Self {
        Self {
            displayed: true,
            opacity: 1.0,
            fade_ms: 0,
        }
    }

    fn hidden() -> Self {
        Self {
            displayed: false,
            opacity: 0.0,
            fade_ms: 0,
        }
    }

    fn fade_out(&mut self, over: Duration) {
        self.opacity = 0.0;
        self.fade_ms = over.as_millis() as u64;
    }

    fn fade_in(&mut self, over: Duration) {
        self.displayed = true;
        self.opacity = 1.0;
        self.fade_ms = over.as_millis() as u64;
    }

    pub fn frame(&self) -> PanelFrame {
        PanelFrame {
            displayed: self.displayed,
            opacity: self.opacity,
            fade_ms: self.fade_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitControl {
    pub disabled: bool,
    pub label: String,
    pub spinner_visible: bool,
}

impl SubmitControl {
    fn ready(labels: &SubmitLabels) -> Self {
        Self {
            disabled: false,
            label: labels.submit.clone(),
            spinner_visible: false,
        }
    }

    fn pending(labels: &SubmitLabels) -> Self {
        Self {
            disabled: true,
            label: labels.pending.clone(),
            spinner_visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub id: u64,
    pub message: String,
    pub fading: bool,
}

/// Explicit state of the booking page; painted through [`render`].
#[derive(Debug, Clone)]
pub struct FormState {
    pub form: BookingForm,
    pub steps: StepMachine,
    pub lifecycle: SubmissionLifecycle,
    pub form_panel: PanelState,
    pub success_panel: PanelState,
    pub submit: SubmitControl,
    pub banner: Option<Banner>,
    pub dropdown: Option<Dropdown>,
}

// Deferred visual transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    RevealSuccess,
    RevealForm,
    FadeBanner(u64),
    RemoveBanner(u64),
    ClearOptionConfirmation,
}

#[derive(Debug)]
struct Scheduled {
    due: Instant,
    effect: Deferred,
}

/// Result of a submit action.
#[derive(Debug)]
pub enum SubmitOutcome {
    // Lifecycle not idle or form hidden
    Ignored,
    Rejected(ValidationError),
    // Submit on a non-final step moved to the next step
    Advanced,
    Booked,
    Failed(SubmissionError),
}

/// First half of a submit action.
pub enum SubmitStart<E> {
    // Lifecycle is now Submitting; the request still has to be sent
    Sending(PendingSubmit<E>),
    Settled(SubmitOutcome),
}

/// A booking request that has been collected but not yet sent.
///
/// Owns everything the request needs so the controller stays free to handle
/// events while it is in flight.
pub struct PendingSubmit<E> {
    endpoint: Arc<E>,
    action: String,
    submission: FormSubmission,
}

impl<E: BookingEndpoint> PendingSubmit<E> {
    pub async fn send(self) -> Result<(), SubmissionError> {
        self.endpoint.submit(&self.action, &self.submission).await
    }
}

pub struct BookingController<E, V> {
    state: FormState,
    endpoint: Arc<E>,
    view: V,
    labels: SubmitLabels,
    schedule: Vec<Scheduled>,
    next_banner_id: u64,
}

impl<E, V> BookingController<E, V>
where
    E: BookingEndpoint,
    V: FormView,
{
    pub fn new(
        form: BookingForm,
        dropdown: Option<Dropdown>,
        endpoint: E,
        view: V,
        labels: SubmitLabels,
    ) -> Self {
        let steps = StepMachine::new(form.step_count());
        let submit = SubmitControl::ready(&labels);

        let mut controller = Self {
            state: FormState {
                form,
                steps,
                lifecycle: SubmissionLifecycle::Idle,
                form_panel: PanelState::shown(),
                success_panel: PanelState::hidden(),
                submit,
                banner: None,
                dropdown,
            },
            endpoint: Arc::new(endpoint),
            view,
            labels,
            schedule: Vec::new(),
            next_banner_id: 0,
        };

        info!(
            "Booking form ready with {} step(s)",
            controller.state.steps.total()
        );
        controller.paint();
        controller
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn lifecycle(&self) -> SubmissionLifecycle {
        self.state.lifecycle
    }

    pub fn current_step(&self) -> usize {
        self.state.steps.current()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn frame(&self) -> ViewFrame {
        render(&self.state)
    }

    fn paint(&mut self) {
        let frame = render(&self.state);
        self.view.paint(&frame);
    }

    fn transition(&mut self, next: SubmissionLifecycle) {
        let current = self.state.lifecycle;
        if !current.can_transition_to(next) {
            warn!(
                "Ignoring lifecycle transition {} -> {}",
                current.as_str(),
                next.as_str()
            );
            return;
        }

        debug!("Lifecycle {} -> {}", current.as_str(), next.as_str());
        self.state.lifecycle = next;
        self.paint();
    }

    fn schedule_after(&mut self, delay: Duration, effect: Deferred) {
        self.schedule.push(Scheduled {
            due: Instant::now() + delay,
            effect,
        });
    }

    /// Earliest pending visual transition, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.iter().map(|entry| entry.due).min()
    }

    /// Applies every scheduled transition due at `now`, earliest first.
    pub fn run_due(&mut self, now: Instant) {
        loop {
            let next = self
                .schedule
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.due <= now)
                .min_by_key(|(_, entry)| entry.due)
                .map(|(position, _)| position);

            let Some(position) = next else { break };
            let entry = self.schedule.remove(position);
            self.apply(entry.effect, entry.due);
        }
    }

    fn apply(&mut self, effect: Deferred, due: Instant) {
        match effect {
            Deferred::RevealSuccess => {
                self.state.form_panel.displayed = false;
                self.state.success_panel.fade_in(SUCCESS_REVEAL_DELAY);
                self.paint();
                self.view.scroll_into_view(&ScrollTarget::SuccessPanel);
            }
            Deferred::RevealForm => {
                self.state.success_panel.displayed = false;
                self.state.form_panel.fade_in(BOOK_ANOTHER_FADE);
                self.paint();
                self.view.scroll_into_view(&ScrollTarget::Form);
            }
            Deferred::FadeBanner(id) => {
                if let Some(banner) = self.state.banner.as_mut().filter(|b| b.id == id) {
                    banner.fading = true;
                    // Removal is relative to the fade, not to when the driver woke up
                    self.schedule.push(Scheduled {
                        due: due + BANNER_FADE,
                        effect: Deferred::RemoveBanner(id),
                    });
                    self.paint();
                }
            }
            Deferred::RemoveBanner(id) => {
                if self.state.banner.as_ref().is_some_and(|b| b.id == id) {
                    self.state.banner = None;
                    debug!("Error banner {} removed", id);
                    self.paint();
                }
            }
            Deferred::ClearOptionConfirmation => {
                if let Some(dropdown) = self.state.dropdown.as_mut() {
                    dropdown.clear_confirmation();
                    self.paint();
                }
            }
        }
    }

    /// Validates one field by name and repaints its marker.
    pub fn validate_field(&mut self, name: &str) -> bool {
        let Some(field) = self.state.form.field_mut(name) else {
            warn!("Unknown field '{}'", name);
            return false;
        };
        let valid = validate_field(field);
        self.paint();
        valid
    }

    fn check_step(&mut self, index: usize) -> Result<(), ValidationError> {
        let result = match self.state.form.step_mut(index) {
            Some(step) => validate_step_fields(step),
            None => Ok(()),
        };
        self.paint();
        result
    }

    /// Validates the required fields of one step. Unknown steps are valid.
    pub fn validate_step(&mut self, index: usize) -> bool {
        self.check_step(index).is_ok()
    }

    fn check_form(&mut self) -> Result<(), ValidationError> {
        let result = self.check_step(self.state.steps.current());
        if let Err(err) = &result {
            info!("Form validation failed for {} field(s)", err.issues.len());
            if let Some(name) = err.first_field() {
                let target = ScrollTarget::Field(name.to_string());
                self.view.scroll_into_view(&target);
            }
        }
        result
    }

    /// Validates the visible step and scrolls to the first invalid field.
    pub fn validate_form(&mut self) -> bool {
        self.check_form().is_ok()
    }

    /// Real-time validation for a single control.
    pub fn on_input(&mut self, name: &str, value: &str) {
        let Some(field) = self.state.form.field_mut(name) else {
            warn!("Input for unknown field '{}'", name);
            return;
        };
        field.value = value.to_string();
        if field.required {
            validate_field(field);
        }
        self.paint();
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) {
        let value = if checked { "on" } else { "" };
        self.on_input(name, value);
    }

    /// Change event for selects and date inputs.
    pub fn on_field_change(&mut self, name: &str, value: &str) {
        let Some(field) = self.state.form.field_mut(name) else {
            warn!("Change for unknown field '{}'", name);
            return;
        };
        field.value = value.to_string();
        if matches!(field.kind, FieldKind::Select | FieldKind::Date) {
            field.has_value = !value.is_empty();
        }
        self.paint();
    }

    pub fn advance(&mut self) -> bool {
        let valid = self.check_form().is_ok();
        let moved = self.state.steps.advance(valid);
        if moved {
            self.paint();
        }
        moved
    }

    pub fn retreat(&mut self) -> bool {
        let moved = self.state.steps.retreat();
        if moved {
            self.paint();
        }
        moved
    }

    fn can_submit(&self) -> bool {
        self.state.lifecycle == SubmissionLifecycle::Idle && self.state.form_panel.displayed
    }

    /// Submits the booking from the final step and waits for the response.
    pub async fn submit(&mut self) -> SubmitOutcome {
        match self.begin_submit() {
            SubmitStart::Sending(request) => {
                let result = request.send().await;
                self.finish_submit(result)
            }
            SubmitStart::Settled(outcome) => outcome,
        }
    }

    /// Validates, locks the submit control and collects the request.
    ///
    /// Further submits are ignored until [`BookingController::finish_submit`]
    /// receives the response.
    pub fn begin_submit(&mut self) -> SubmitStart<E> {
        if !self.can_submit() {
            debug!(
                "Submit ignored while {} (form displayed: {})",
                self.state.lifecycle.as_str(),
                self.state.form_panel.displayed
            );
            return SubmitStart::Settled(SubmitOutcome::Ignored);
        }

        if let Err(err) = self.check_form() {
            return SubmitStart::Settled(SubmitOutcome::Rejected(err));
        }

        if !self.state.steps.is_final() {
            self.state.steps.advance(true);
            self.paint();
            return SubmitStart::Settled(SubmitOutcome::Advanced);
        }

        self.state.submit = SubmitControl::pending(&self.labels);
        self.transition(SubmissionLifecycle::Submitting);

        SubmitStart::Sending(PendingSubmit {
            endpoint: Arc::clone(&self.endpoint),
            action: self.state.form.action.clone(),
            submission: FormSubmission::collect(&self.state.form, Utc::now()),
        })
    }

    /// Applies the endpoint's response to a submit started by `begin_submit`.
    pub fn finish_submit(&mut self, result: Result<(), SubmissionError>) -> SubmitOutcome {
        if self.state.lifecycle != SubmissionLifecycle::Submitting {
            warn!("Response received while {}", self.state.lifecycle.as_str());
            return SubmitOutcome::Ignored;
        }

        let outcome = match result {
            Ok(()) => {
                info!("Booking submitted successfully");
                self.transition(SubmissionLifecycle::Success);
                self.state.form_panel.fade_out(SUCCESS_REVEAL_DELAY);
                self.schedule_after(SUCCESS_REVEAL_DELAY, Deferred::RevealSuccess);
                self.clear_form();
                SubmitOutcome::Booked
            }
            Err(err) => {
                error!("Error submitting booking: {}", err);
                #[cfg(feature = "sentry-monitoring")]
                sentry::capture_error(&err);

                self.transition(SubmissionLifecycle::Failed);
                self.show_error(err.user_message());
                self.transition(SubmissionLifecycle::Idle);
                SubmitOutcome::Failed(err)
            }
        };

        self.state.submit = SubmitControl::ready(&self.labels);
        self.paint();
        outcome
    }

    fn clear_form(&mut self) {
        self.state.form.reset();
        self.state.steps.restart();
        if let Some(dropdown) = self.state.dropdown.as_mut() {
            dropdown.reset();
        }
        self.paint();
    }

    /// "Book another": returns from the success panel to an empty form.
    pub fn book_another(&mut self) -> bool {
        if self.state.lifecycle != SubmissionLifecycle::Success {
            debug!("Book another ignored while {}", self.state.lifecycle.as_str());
            return false;
        }

        self.schedule
            .retain(|entry| entry.effect != Deferred::RevealSuccess);
        self.state.success_panel.fade_out(BOOK_ANOTHER_FADE);
        self.state.form_panel.displayed = false;
        self.schedule_after(BOOK_ANOTHER_FADE, Deferred::RevealForm);
        self.clear_form();
        self.transition(SubmissionLifecycle::Idle);
        true
    }

    fn show_error(&mut self, message: &str) {
        self.next_banner_id += 1;
        let id = self.next_banner_id;

        if self.state.banner.replace(Banner {
            id,
            message: message.to_string(),
            fading: false,
        }).is_some() {
            debug!("Replaced previous error banner");
        }

        self.schedule_after(BANNER_LIFETIME, Deferred::FadeBanner(id));
        self.paint();
        self.view.scroll_into_view(&ScrollTarget::Banner);
    }

    /// Close button of the error banner.
    pub fn dismiss_banner(&mut self) {
        if self.state.banner.take().is_some() {
            self.paint();
        }
    }

    pub fn click_dropdown(&mut self) {
        if let Some(dropdown) = self.state.dropdown.as_mut() {
            dropdown.click_toggle();
            self.paint();
        }
    }

    pub fn choose_option(&mut self, index: usize) -> bool {
        let Some(dropdown) = self.state.dropdown.as_mut() else {
            return false;
        };
        let Some(value) = dropdown.choose(index) else {
            warn!("Dropdown option {} does not exist", index);
            return false;
        };
        let field_name = dropdown.field_name.clone();

        match self.state.form.field_mut(&field_name) {
            Some(field) => field.value = value,
            None => warn!("Dropdown bound to unknown field '{}'", field_name),
        }

        self.schedule
            .retain(|entry| entry.effect != Deferred::ClearOptionConfirmation);
        self.schedule_after(OPTION_CONFIRM, Deferred::ClearOptionConfirmation);
        self.paint();
        true
    }

    pub fn dropdown_toggle_key(&mut self, key: DropdownKey) {
        if let Some(dropdown) = self.state.dropdown.as_mut() {
            if dropdown.toggle_key(key) {
                self.paint();
            }
        }
    }

    pub fn dropdown_menu_key(&mut self, key: DropdownKey) {
        if let Some(dropdown) = self.state.dropdown.as_mut() {
            if dropdown.menu_key(key) {
                self.paint();
            }
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;
