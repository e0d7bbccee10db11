use tracing::{debug, info, warn};

use crate::models::clock::TickMark;
use crate::services::clock::ClockFrame;
use crate::view::{ClockView, FormView, ScrollTarget, ViewFrame};

/// Views that log what a browser would paint.
#[derive(Debug, Default)]
pub struct ConsoleView {
    last: Option<ViewFrame>,
}

impl ConsoleView {
    pub fn last_frame(&self) -> Option<&ViewFrame> {
        self.last.as_ref()
    }
}

impl FormView for ConsoleView {
    fn paint(&mut self, frame: &ViewFrame) {
        let changed_lifecycle = self
            .last
            .as_ref()
            .map_or(true, |last| last.lifecycle != frame.lifecycle);

        if changed_lifecycle {
            info!("Booking form is {}", frame.lifecycle.as_str());
        }

        let invalid = frame.invalid_fields();
        if !invalid.is_empty() {
            warn!("Invalid fields: {}", invalid.join(", "));
        }

        if let Some(banner) = &frame.banner {
            if !banner.fading {
                warn!("{}", banner.message);
            }
        }

        debug!(
            "step {}/{} form={} success={} submit='{}'",
            frame.current_step,
            frame.progress.len(),
            frame.form.displayed,
            frame.success.displayed,
            frame.submit.label
        );

        self.last = Some(frame.clone());
    }

    fn scroll_into_view(&mut self, target: &ScrollTarget) {
        debug!("Scrolling to {:?}", target);
    }
}

#[derive(Debug, Default)]
pub struct ConsoleClockView;

impl ClockView for ConsoleClockView {
    fn place_ticks(&mut self, ticks: &[TickMark]) {
        debug!("Placed {} tick marks", ticks.len());
    }

    fn paint_hands(&mut self, frame: &ClockFrame) {
        info!(
            "{:02}:{:02}:{:02}  hour {:>6.1}°  minute {:>6.1}°  second {:>6.1}°",
            frame.state.hour,
            frame.state.minute,
            frame.state.second,
            frame.angles.hour,
            frame.angles.minute,
            frame.angles.second
        );
    }
}
