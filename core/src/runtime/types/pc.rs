//! Resume points
//!
//! Each resumable body declares its own resume points as constants and
//! dispatches on them with a `match` at the top of every pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker saved in a frame at a suspension, naming where the next pass continues.
///
/// Bodies declare their points as constants so they can be used as match patterns:
///
/// ```
/// use latent_core::runtime::ResumePoint;
///
/// const LOOP_HEAD: ResumePoint = ResumePoint::new(1);
/// assert_ne!(LOOP_HEAD, ResumePoint::START);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumePoint(u32);

impl ResumePoint {
    /// Every frame starts here
    pub const START: ResumePoint = ResumePoint(0);

    pub const fn new(point: u32) -> Self {
        ResumePoint(point)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for ResumePoint {
    fn default() -> Self {
        ResumePoint::START
    }
}

impl fmt::Display for ResumePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
