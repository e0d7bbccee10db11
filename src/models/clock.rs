use serde::Serialize;

// Easing shared by all three hands
pub const HAND_EASING: &str = "cubic-bezier(0.4, 2.3, 0.6, 1)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Hand {
    Hour,
    Minute,
    Second,
}

impl Hand {
    // Transition length applied on ticks that are not a minute boundary
    pub fn transition_secs(&self) -> f64 {
        match self {
            Hand::Second => 0.05,
            Hand::Minute => 0.3,
            Hand::Hour => 0.5,
        }
    }
}

/// Wall-clock time read on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockState {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

/// Rotation of each hand in degrees.
///
/// The hand artwork rests pointing at nine o'clock, so every rotation carries a
/// 90 degree offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl HandAngles {
    pub fn at(hour: u32, minute: u32, second: u32) -> Self {
        let (h, m, s) = (hour as f64, minute as f64, second as f64);

        Self {
            second: (s / 60.0) * 360.0 + 90.0,
            minute: (m / 60.0) * 360.0 + (s / 60.0) * 6.0 + 90.0,
            hour: (h / 12.0) * 360.0 + (m / 60.0) * 30.0 + 90.0,
        }
    }

    pub fn of(state: &ClockState) -> Self {
        Self::at(state.hour, state.minute, state.second)
    }

    pub fn get(&self, hand: Hand) -> f64 {
        match hand {
            Hand::Hour => self.hour,
            Hand::Minute => self.minute,
            Hand::Second => self.second,
        }
    }
}

// CSS-like transition applied to one hand for the current tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HandTransition {
    None,
    Eased { duration_secs: f64, easing: &'static str },
}

/// One of the twelve static marks around the face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickMark {
    pub position: u32,
    pub rotation: f64,
}
