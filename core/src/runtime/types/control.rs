//! Pass outcomes and call lifecycle

use serde::{Deserialize, Serialize};

/* ===================== Step ===================== */

/// Result of running one pass of a resumable body
///
/// Suspension is not an error: `Yield` is the expected outcome of every pass
/// but the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The body suspended and wants another pass
    Yield,
    /// The body ran to completion
    Done,
}

impl Step {
    pub fn is_done(self) -> bool {
        self == Step::Done
    }

    pub fn from_done(done: bool) -> Self {
        if done {
            Step::Done
        } else {
            Step::Yield
        }
    }
}

/* ===================== Call Status ===================== */

/// Lifecycle of a ResumableCall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// Constructed or reset; parameters may be pushed
    Initializing,
    /// At least one pass ran and the body suspended
    InProgress,
    /// A pass completed the body
    Done,
    /// A pass hit a protocol violation; only `reset()` is valid now
    Failed,
}

impl CallStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, CallStatus::Done | CallStatus::Failed)
    }
}

impl From<Step> for CallStatus {
    fn from(step: Step) -> Self {
        match step {
            Step::Yield => CallStatus::InProgress,
            Step::Done => CallStatus::Done,
        }
    }
}
