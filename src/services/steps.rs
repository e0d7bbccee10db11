use serde::Serialize;
use tracing::debug;

// How a progress-indicator step is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressMark {
    Completed,
    Active,
    Pending,
}

/// Linear step machine over `1..=total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMachine {
    current: usize,
    total: usize,
}

impl StepMachine {
    pub fn new(total: usize) -> Self {
        Self {
            current: 1,
            total: total.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_final(&self) -> bool {
        self.current == self.total
    }

    /// Moves forward when the current step validated; returns whether the step changed.
    pub fn advance(&mut self, current_step_valid: bool) -> bool {
        if !current_step_valid {
            debug!("Step {} incomplete, staying put", self.current);
            return false;
        }
        if self.is_final() {
            return false;
        }
        self.current += 1;
        debug!("Advanced to step {}/{}", self.current, self.total);
        true
    }

    pub fn retreat(&mut self) -> bool {
        if self.current == 1 {
            return false;
        }
        self.current -= 1;
        debug!("Went back to step {}/{}", self.current, self.total);
        true
    }

    pub fn restart(&mut self) {
        self.current = 1;
    }

    pub fn mark(&self, index: usize) -> ProgressMark {
        if index < self.current {
            ProgressMark::Completed
        } else if index == self.current {
            ProgressMark::Active
        } else {
            ProgressMark::Pending
        }
    }

    pub fn progress(&self) -> Vec<ProgressMark> {
        (1..=self.total).map(|index| self.mark(index)).collect()
    }
}
