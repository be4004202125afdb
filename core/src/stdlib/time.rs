//! Waiting across passes
//!
//! Time is logical: each pass after the first one consumes one tick. The
//! client decides how much wall-clock time a tick represents.

use crate::prologue;
use crate::runtime::{CallStack, FrameScope, LatentError, ResumePoint, Step};

/// Logical milliseconds consumed by one pass
pub const TICK_MS: i64 = 100;

const TICK: ResumePoint = ResumePoint::new(1);

/// Wait for the given number of milliseconds (param 0, `i64`).
///
/// A wait of zero or less completes on the first pass. Otherwise the first
/// pass suspends and every following pass subtracts one tick, completing on
/// the pass that brings the remainder to zero or below.
pub fn wait_ms(stack: &mut CallStack) -> Result<Step, LatentError> {
    prologue!(stack; param remaining: i64);

    let mut scope = FrameScope::enter(stack)?;
    match scope.resume_point()? {
        ResumePoint::START => {
            let done = *scope.get(remaining)? <= 0;
            scope.suspend_unless(TICK, done)
        }
        TICK => {
            let left = scope.get_mut(remaining)?;
            *left -= TICK_MS;
            let done = *left <= 0;
            scope.suspend_unless(TICK, done)
        }
        other => Err(LatentError::unknown_resume_point(other)),
    }
}

/// Suspend for exactly the given number of passes (param 0, `u32`)
pub fn wait_ticks(stack: &mut CallStack) -> Result<Step, LatentError> {
    prologue!(stack; param ticks: u32);

    let mut scope = FrameScope::enter(stack)?;
    match scope.resume_point()? {
        ResumePoint::START | TICK => {
            let left = scope.get_mut(ticks)?;
            if *left == 0 {
                return Ok(Step::Done);
            }
            *left -= 1;
            scope.suspend(TICK)
        }
        other => Err(LatentError::unknown_resume_point(other)),
    }
}
