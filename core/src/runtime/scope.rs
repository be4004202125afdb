//! Scoped frame entry for resumable bodies

use super::errors::Result;
use super::stack::CallStack;
use super::types::{ResumePoint, Step};
use std::ops::{Deref, DerefMut};
use tracing::error;

/// Guard that keeps the active-frame cursor balanced around one pass of a body.
///
/// Entering moves the cursor into the body's frame; dropping the guard moves it
/// back out, whether the pass completed, suspended, or bailed out with `?`.
/// The guard dereferences to the CallStack so the body keeps full access to
/// its slots and to nested calls.
#[derive(Debug)]
pub struct FrameScope<'a> {
    stack: &'a mut CallStack,
}

impl<'a> FrameScope<'a> {
    pub fn enter(stack: &'a mut CallStack) -> Result<Self> {
        stack.enter_active_frame()?;
        Ok(FrameScope { stack })
    }

    /// Where this pass should pick up
    pub fn resume_point(&self) -> Result<ResumePoint> {
        self.stack.resume_point_of_caller()
    }

    /// Record `point` and keep running; the body's dispatch loop goes there next
    pub fn jump(&mut self, point: ResumePoint) -> Result<()> {
        self.stack.set_resume_point_of_caller(point)
    }

    /// Record `point` and end the pass
    pub fn suspend(&mut self, point: ResumePoint) -> Result<Step> {
        self.stack.set_resume_point_of_caller(point)?;
        Ok(Step::Yield)
    }

    /// Record `point` and end the pass, reporting completion when `done`
    pub fn suspend_unless(&mut self, point: ResumePoint, done: bool) -> Result<Step> {
        self.stack.set_resume_point_of_caller(point)?;
        Ok(Step::from_done(done))
    }
}

impl Deref for FrameScope<'_> {
    type Target = CallStack;

    fn deref(&self) -> &CallStack {
        self.stack
    }
}

impl DerefMut for FrameScope<'_> {
    fn deref_mut(&mut self) -> &mut CallStack {
        self.stack
    }
}

impl Drop for FrameScope<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.stack.leave_active_frame() {
            error!(%err, "frame scope could not restore the active frame");
        }
    }
}
