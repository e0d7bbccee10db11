use serde::Serialize;

/// Phase of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SubmissionLifecycle {
    #[default]
    Idle,
    Submitting,
    Success,
    Failed,
}

impl SubmissionLifecycle {
    // Whether the transition to `next` is one the controller may take
    pub fn can_transition_to(self, next: SubmissionLifecycle) -> bool {
        use SubmissionLifecycle::*;

        matches!(
            (self, next),
            (Idle, Submitting)
                | (Submitting, Success)
                | (Submitting, Failed)
                | (Failed, Idle)
                | (Success, Idle)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionLifecycle::Idle => "idle",
            SubmissionLifecycle::Submitting => "submitting",
            SubmissionLifecycle::Success => "success",
            SubmissionLifecycle::Failed => "failed",
        }
    }
}
