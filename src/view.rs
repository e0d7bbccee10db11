//! Painting surface for the booking form and the clock.
//!
//! The controller never touches a rendering surface directly. It keeps an
//! explicit [`FormState`], [`render`] turns that state into a [`ViewFrame`], and a
//! [`FormView`] paints frames. Tests use a recording view; the binary logs frames.

use serde::Serialize;

use crate::controller::FormState;
use crate::models::form::FieldKind;
use crate::models::lifecycle::SubmissionLifecycle;
use crate::services::clock::ClockFrame;
use crate::services::dropdown::DropdownFocus;
use crate::services::steps::ProgressMark;
use crate::models::clock::TickMark;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelFrame {
    pub displayed: bool,
    pub opacity: f32,
    pub fade_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitControlFrame {
    pub disabled: bool,
    pub label: String,
    pub spinner_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerFrame {
    pub id: u64,
    pub message: String,
    pub fading: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldFrame {
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
    pub step: usize,
    pub visible: bool,
    pub invalid: bool,
    pub has_value: bool,
    pub min_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownFrame {
    pub toggle_label: String,
    pub expanded: bool,
    pub option_selected: bool,
    pub focus: DropdownFocus,
}

/// Everything a view needs to paint the booking form at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewFrame {
    pub lifecycle: SubmissionLifecycle,
    pub current_step: usize,
    pub progress: Vec<ProgressMark>,
    pub form: PanelFrame,
    pub success: PanelFrame,
    pub submit: SubmitControlFrame,
    pub banner: Option<BannerFrame>,
    pub fields: Vec<FieldFrame>,
    pub dropdown: Option<DropdownFrame>,
}

impl ViewFrame {
    pub fn field(&self, name: &str) -> Option<&FieldFrame> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn invalid_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.invalid)
            .map(|field| field.name.as_str())
            .collect()
    }
}

// Element the view should bring into view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScrollTarget {
    Field(String),
    Form,
    SuccessPanel,
    Banner,
}

pub trait FormView: Send {
    fn paint(&mut self, frame: &ViewFrame);
    fn scroll_into_view(&mut self, target: &ScrollTarget);
}

pub trait ClockView: Send {
    fn place_ticks(&mut self, ticks: &[TickMark]);
    fn paint_hands(&mut self, frame: &ClockFrame);
}

/// Pure projection of the controller state.
pub fn render(state: &FormState) -> ViewFrame {
    let current_step = state.steps.current();

    let fields = state
        .form
        .steps
        .iter()
        .flat_map(|step| {
            step.fields.iter().map(move |field| FieldFrame {
                name: field.name.clone(),
                kind: field.kind,
                value: field.value.clone(),
                step: step.index,
                visible: step.index == current_step,
                invalid: field.invalid,
                has_value: field.has_value,
                min_date: field.min_date.map(|date| date.format("%Y-%m-%d").to_string()),
            })
        })
        .collect();

    ViewFrame {
        lifecycle: state.lifecycle,
        current_step,
        progress: state.steps.progress(),
        form: state.form_panel.frame(),
        success: state.success_panel.frame(),
        submit: SubmitControlFrame {
            disabled: state.submit.disabled,
            label: state.submit.label.clone(),
            spinner_visible: state.submit.spinner_visible,
        },
        banner: state.banner.as_ref().map(|banner| BannerFrame {
            id: banner.id,
            message: banner.message.clone(),
            fading: banner.fading,
        }),
        fields,
        dropdown: state.dropdown.as_ref().map(|dropdown| DropdownFrame {
            toggle_label: dropdown.toggle_label().to_string(),
            expanded: dropdown.expanded,
            option_selected: dropdown.option_selected,
            focus: dropdown.focus,
        }),
    }
}
