//! Call stack state
//!
//! The CallStack holds everything one resumable invocation needs between passes:
//! - frames: one activation record per resumable body on the nested-call chain
//! - active_frame: whose slots the running body is addressing
//! - active_slot: positional cursor inside the active frame for this pass
//!
//! A body's prologue fetches its parameters and locals from `frames[active_frame]`
//! before it enters its FrameScope. Once entered, the same frame sits just below
//! the cursor (the "caller" position) and holds the body's resume point, while
//! `frames[active_frame]` is where a nested call's frame gets pushed.

use super::errors::{LatentError, Result, UsageError};
use super::types::{Frame, ResumePoint, Step, Var, VariableSlot};
use std::any::{type_name, Any};
use std::task::Poll;
use tracing::{debug, trace};

/// Signature of a resumable body: run one pass against the stack
pub type Resumable = fn(&mut CallStack) -> Result<Step>;

/* ===================== Call Stack ===================== */

#[derive(Debug, Default)]
pub struct CallStack {
    frames: Vec<Frame>,
    active_frame: usize,
    active_slot: Option<usize>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn active_frame(&self) -> usize {
        self.active_frame
    }

    /// Position of the last slot fetched on this pass, `None` before the first
    pub fn active_slot(&self) -> Option<usize> {
        self.active_slot
    }

    /* ===================== Frame Management ===================== */

    /// Append an empty frame for a nested call. The cursor does not move.
    pub fn push_frame(&mut self) {
        self.frames.push(Frame::new());
        debug!(frames = self.frames.len(), active = self.active_frame, "pushed frame");
    }

    /// Retire the last frame and hand it back; dropping it destroys its slots.
    ///
    /// Frames below the active cursor belong to bodies still running on this
    /// pass and cannot be popped.
    pub fn pop_frame(&mut self) -> Result<Frame> {
        if self.frames.len() <= self.active_frame {
            if self.frames.is_empty() {
                return Err(UsageError::EmptyStack.into());
            }
            return Err(UsageError::PopActiveFrame {
                active: self.active_frame,
            }
            .into());
        }
        let frame = self.frames.pop().ok_or(UsageError::EmptyStack)?;
        debug!(frames = self.frames.len(), slots = frame.slot_count(), "popped frame");
        Ok(frame)
    }

    /// Drop every frame, innermost first, and rewind the cursors
    pub fn clear(&mut self) {
        while let Some(frame) = self.frames.pop() {
            drop(frame);
        }
        self.active_frame = 0;
        self.active_slot = None;
    }

    /* ===================== Cursor ===================== */

    /// Step the cursor into the frame a body has just finished its prologue on
    pub fn enter_active_frame(&mut self) -> Result<()> {
        if self.active_frame >= self.frames.len() {
            return Err(UsageError::MissingFrame {
                index: self.active_frame,
                len: self.frames.len(),
            }
            .into());
        }
        self.active_frame += 1;
        self.active_slot = None;
        trace!(active = self.active_frame, "entered frame");
        Ok(())
    }

    pub fn leave_active_frame(&mut self) -> Result<()> {
        self.active_frame = self
            .active_frame
            .checked_sub(1)
            .ok_or(UsageError::FrameUnderflow)?;
        trace!(active = self.active_frame, "left frame");
        Ok(())
    }

    /// Reset the positional cursor before a top-level pass
    pub(crate) fn begin_pass(&mut self) -> Result<()> {
        if self.active_frame != 0 {
            return Err(UsageError::UnbalancedPass {
                active: self.active_frame,
            }
            .into());
        }
        self.active_slot = None;
        Ok(())
    }

    fn caller_index(&self) -> Result<usize> {
        let index = self
            .active_frame
            .checked_sub(1)
            .ok_or(UsageError::FrameUnderflow)?;
        if index >= self.frames.len() {
            return Err(UsageError::MissingFrame {
                index,
                len: self.frames.len(),
            }
            .into());
        }
        Ok(index)
    }

    pub fn resume_point_of_caller(&self) -> Result<ResumePoint> {
        let index = self.caller_index()?;
        Ok(self.frames[index].resume_point())
    }

    pub fn set_resume_point_of_caller(&mut self, point: ResumePoint) -> Result<()> {
        let index = self.caller_index()?;
        self.frames[index].set_resume_point(point);
        Ok(())
    }

    /* ===================== Positional Slots ===================== */

    fn active_frame_mut(&mut self) -> Result<&mut Frame> {
        let len = self.frames.len();
        let index = self.active_frame;
        Ok(self
            .frames
            .get_mut(index)
            .ok_or(UsageError::MissingFrame { index, len })?)
    }

    /// Advance to the next slot of the active frame, creating it with
    /// `default` if this is the first pass to reach it.
    pub fn fetch_or_create_next_slot<T: Any>(&mut self, default: T) -> Result<Var<T>> {
        self.fetch_or_create_next_slot_with(|| default)
    }

    /// Like [`fetch_or_create_next_slot`](Self::fetch_or_create_next_slot),
    /// building the initial value only when the slot is created.
    pub fn fetch_or_create_next_slot_with<T: Any>(
        &mut self,
        init: impl FnOnce() -> T,
    ) -> Result<Var<T>> {
        let frame_index = self.active_frame;
        let next = self.active_slot.map_or(0, |slot| slot + 1);
        let frame = self.active_frame_mut()?;

        match frame.slot_at(next).map(VariableSlot::descriptor) {
            Some(descriptor) if !descriptor.is::<T>() => {
                return Err(LatentError::TypeMismatch {
                    frame: frame_index,
                    slot: next,
                    stored: descriptor.name(),
                    requested: type_name::<T>(),
                });
            }
            Some(_) => {}
            None => {
                frame.push_slot(VariableSlot::new(init()));
                trace!(frame = frame_index, slot = next, ty = type_name::<T>(), "created slot");
            }
        }

        self.active_slot = Some(next);
        Ok(Var::new(frame_index, next))
    }

    /// Advance to the next slot, which must already exist (pushed by the caller)
    pub fn param<T: Any>(&mut self) -> Result<Var<T>> {
        let frame_index = self.active_frame;
        let next = self.active_slot.map_or(0, |slot| slot + 1);
        let frame = self.active_frame_mut()?;

        let len = frame.slot_count();
        let slot = frame.slot_at(next).ok_or(LatentError::OutOfRange {
            frame: frame_index,
            index: next,
            len,
        })?;
        let descriptor = slot.descriptor();
        if !descriptor.is::<T>() {
            return Err(LatentError::TypeMismatch {
                frame: frame_index,
                slot: next,
                stored: descriptor.name(),
                requested: type_name::<T>(),
            });
        }

        self.active_slot = Some(next);
        Ok(Var::new(frame_index, next))
    }

    /// Next slot as a local, default-initialised on first creation
    pub fn local<T: Any + Default>(&mut self) -> Result<Var<T>> {
        self.fetch_or_create_next_slot_with(T::default)
    }

    /// Append a value to the active frame without moving the cursor.
    ///
    /// Used by a caller to pass arguments into a frame it just pushed, and by
    /// ResumableCall to seed the top-level frame.
    pub fn push_param<T: Any>(&mut self, value: T) -> Result<()> {
        let frame_index = self.active_frame;
        let frame = self.active_frame_mut()?;
        frame.push_slot(VariableSlot::new(value));
        trace!(frame = frame_index, slot = frame.slot_count() - 1, ty = type_name::<T>(), "pushed param");
        Ok(())
    }

    /// Random access into the active frame
    pub fn slot<T: Any>(&self, index: usize) -> Result<&T> {
        self.read(self.active_frame, index)
    }

    pub fn get<T: Any>(&self, var: Var<T>) -> Result<&T> {
        self.read(var.frame(), var.slot())
    }

    pub fn get_mut<T: Any>(&mut self, var: Var<T>) -> Result<&mut T> {
        self.read_mut(var.frame(), var.slot())
    }

    pub fn set<T: Any>(&mut self, var: Var<T>, value: T) -> Result<()> {
        *self.get_mut(var)? = value;
        Ok(())
    }

    pub(crate) fn read<T: Any>(&self, frame: usize, index: usize) -> Result<&T> {
        let len = self.frames.len();
        let target = self
            .frames
            .get(frame)
            .ok_or(UsageError::MissingFrame { index: frame, len })?;
        let slot = target.slot_at(index).ok_or(LatentError::OutOfRange {
            frame,
            index,
            len: target.slot_count(),
        })?;
        slot.read_as::<T>()
            .map_err(|err| LatentError::type_mismatch(frame, index, err))
    }

    pub(crate) fn read_mut<T: Any>(&mut self, frame: usize, index: usize) -> Result<&mut T> {
        let len = self.frames.len();
        let target = self
            .frames
            .get_mut(frame)
            .ok_or(UsageError::MissingFrame { index: frame, len })?;
        let slot_count = target.slot_count();
        let slot = target.slot_at_mut(index).ok_or(LatentError::OutOfRange {
            frame,
            index,
            len: slot_count,
        })?;
        slot.read_as_mut::<T>()
            .map_err(|err| LatentError::type_mismatch(frame, index, err))
    }

    /* ===================== Nested Calls ===================== */

    /// Whether a nested frame has been pushed above the running body
    pub fn has_pending_call(&self) -> bool {
        self.frames.len() > self.active_frame
    }

    /// Run one pass of `body` against the nested frame pushed at the cursor.
    ///
    /// Frames above that one belong to the callee's own pending calls. The
    /// frame is left in place whatever the outcome; the caller pops it once
    /// the body reports `Done`.
    pub fn run_nested(&mut self, body: Resumable) -> Result<Step> {
        let active = self.active_frame;
        if !self.has_pending_call() {
            return Err(UsageError::UnbracketedCall {
                frames: self.frames.len(),
                active,
            }
            .into());
        }

        self.active_slot = None;
        let step = body(self)?;

        if self.active_frame != active {
            return Err(UsageError::UnbalancedPass {
                active: self.active_frame,
            }
            .into());
        }
        Ok(step)
    }

    /// Drive a nested call for this pass.
    ///
    /// On the first pass that reaches the call site the nested frame is pushed
    /// and `push_args` seeds its parameters; later passes only resume it. The
    /// frame is popped as soon as the callee completes.
    pub fn call(
        &mut self,
        body: Resumable,
        push_args: impl FnOnce(&mut CallStack) -> Result<()>,
    ) -> Result<Step> {
        if !self.has_pending_call() {
            self.push_frame();
            push_args(self)?;
        }

        let step = self.run_nested(body)?;
        if step.is_done() {
            self.retire_nested()?;
        }
        Ok(step)
    }

    /// [`call`](Self::call) for a callee taking a single parameter
    pub fn call_with<A: Any>(&mut self, body: Resumable, arg: A) -> Result<Step> {
        self.call(body, |stack| stack.push_param(arg))
    }

    /// [`call`](Self::call) for a callee that leaves its result in slot 0.
    ///
    /// Returns the result, moved out of the retired frame, once the callee completes.
    pub fn call_for<R: Any>(
        &mut self,
        body: Resumable,
        push_args: impl FnOnce(&mut CallStack) -> Result<()>,
    ) -> Result<Poll<R>> {
        if !self.has_pending_call() {
            self.push_frame();
            push_args(self)?;
        }

        match self.run_nested(body)? {
            Step::Yield => Ok(Poll::Pending),
            Step::Done => {
                let frame_index = self.active_frame;
                let frame = self.retire_nested()?;
                let slot = frame.into_slot(0).ok_or(LatentError::OutOfRange {
                    frame: frame_index,
                    index: 0,
                    len: 0,
                })?;
                slot.into_value::<R>()
                    .map(Poll::Ready)
                    .map_err(|err| LatentError::type_mismatch(frame_index, 0, err))
            }
        }
    }

    /// Pop the frame of a completed nested call, which must be the last one
    fn retire_nested(&mut self) -> Result<Frame> {
        if self.frames.len() != self.active_frame + 1 {
            return Err(UsageError::UnbracketedCall {
                frames: self.frames.len(),
                active: self.active_frame,
            }
            .into());
        }
        self.pop_frame()
    }
}

impl Drop for CallStack {
    fn drop(&mut self) {
        self.clear();
    }
}
