use chrono::{Local, Timelike};
use serde::Serialize;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::models::clock::{ClockState, Hand, HandAngles, HandTransition, TickMark, HAND_EASING};
use crate::view::ClockView;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const TICK_MARK_COUNT: u32 = 12;

/// Source of wall-clock time for the clock widget.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> ClockState;
}

// Local system time
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&self) -> ClockState {
        let now = Local::now();
        ClockState {
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
        }
    }
}

/// What the view applies to the hands on one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockFrame {
    pub state: ClockState,
    pub angles: HandAngles,
    pub transitions: [(Hand, HandTransition); 3],
}

impl ClockFrame {
    pub fn transition(&self, hand: Hand) -> &HandTransition {
        self.transitions
            .iter()
            .find(|(h, _)| *h == hand)
            .map(|(_, transition)| transition)
            .unwrap_or(&HandTransition::None)
    }
}

/// Transition for a hand; suspended on the minute boundary so hands snap instead
/// of sweeping back through a full turn.
pub fn hand_transition(hand: Hand, second: u32) -> HandTransition {
    if second == 0 {
        HandTransition::None
    } else {
        HandTransition::Eased {
            duration_secs: hand.transition_secs(),
            easing: HAND_EASING,
        }
    }
}

pub fn render_clock(state: ClockState) -> ClockFrame {
    ClockFrame {
        state,
        angles: HandAngles::of(&state),
        transitions: [Hand::Second, Hand::Minute, Hand::Hour]
            .map(|hand| (hand, hand_transition(hand, state.second))),
    }
}

/// The twelve static marks, 30 degrees apart.
pub fn tick_marks() -> Vec<TickMark> {
    (1..=TICK_MARK_COUNT)
        .map(|position| TickMark {
            position,
            rotation: (position * 30) as f64,
        })
        .collect()
}

pub struct ClockWidget<T, V> {
    source: T,
    view: V,
}

impl<T, V> ClockWidget<T, V>
where
    T: TimeSource,
    V: ClockView,
{
    /// Lays out the tick marks once; hands are painted by [`ClockWidget::tick`].
    pub fn new(source: T, mut view: V) -> Self {
        view.place_ticks(&tick_marks());
        Self { source, view }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn tick(&mut self) -> ClockFrame {
        let frame = render_clock(self.source.now());
        debug!(
            "Clock {:02}:{:02}:{:02} -> hour {}°, minute {}°, second {}°",
            frame.state.hour,
            frame.state.minute,
            frame.state.second,
            frame.angles.hour,
            frame.angles.minute,
            frame.angles.second
        );
        self.view.paint_hands(&frame);
        frame
    }

    /// Ticks immediately, then once per second. Runs until `max_ticks` or forever.
    pub async fn run(mut self, max_ticks: Option<u64>) -> Self {
        info!("Clock widget started");
        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut ticks = 0u64;
        loop {
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            ticker.tick().await;
            self.tick();
            ticks += 1;
        }

        info!("Clock widget stopped after {} tick(s)", ticks);
        self
    }
}

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;
