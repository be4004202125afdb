//! # Runtime - Resumable Functions Without Native Coroutines
//!
//! A resumable body is an ordinary `fn(&mut CallStack) -> Result<Step, LatentError>`
//! written as an explicit state machine:
//!
//! 1. **Prologue**: fetch every parameter and local positionally from the
//!    active frame (see [`prologue!`](crate::prologue)). The same sequence
//!    replays on every pass; locals are created on the first pass only.
//! 2. **Enter**: open a [`FrameScope`], which moves the active-frame cursor
//!    into the body's frame and restores it on every exit path.
//! 3. **Dispatch**: `match` on the saved [`ResumePoint`] and continue at the
//!    matching arm. `jump` moves to another arm within the same pass,
//!    `suspend` records the point and ends the pass.
//! 4. **Nested calls**: [`CallStack::call`] pushes the callee's frame once,
//!    runs one pass of the callee per pass of the caller, and pops the frame
//!    when the callee completes.
//!
//! The client owns a [`ResumableCall`], pushes parameters, calls `start()`
//! once and `step()` until `is_done()`.

pub mod call;
pub mod errors;
pub mod protocol;
pub mod scope;
pub mod stack;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use call::ResumableCall;
pub use errors::{LatentError, SlotTypeError, UsageError};
pub use scope::FrameScope;
pub use stack::{CallStack, Resumable};
pub use types::{CallStatus, Frame, ResumePoint, Step, TypeDescriptor, Var, VariableSlot};
