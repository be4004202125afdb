//! The externally visible unit of work
//!
//! A ResumableCall owns one CallStack and walks it through
//! Initializing -> InProgress -> Done, one pass per `start()`/`step()`.

use super::errors::{Result, UsageError};
use super::stack::{CallStack, Resumable};
use super::types::{CallStatus, Step};
use std::any::Any;
use tracing::{debug, debug_span, error};
use uuid::Uuid;

pub struct ResumableCall {
    id: Uuid,
    stack: CallStack,
    status: CallStatus,
    entry: Option<Resumable>,
    passes: u64,
}

impl ResumableCall {
    pub fn new() -> Self {
        ResumableCall {
            id: Uuid::new_v4(),
            stack: CallStack::new(),
            status: CallStatus::Initializing,
            entry: None,
            passes: 0,
        }
    }

    /// Identifier used to correlate this call's log lines
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn is_done(&self) -> bool {
        self.status == CallStatus::Done
    }

    /// Number of passes run since construction or the last reset
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    /// Push the next positional parameter of the entry function.
    ///
    /// By convention slot 0 holds the result when the entry function produces one.
    pub fn push_param<T: Any>(&mut self, value: T) -> Result<()> {
        if self.status != CallStatus::Initializing {
            return Err(UsageError::AlreadyStarted.into());
        }
        self.ensure_top_frame();
        self.stack.push_param(value)
    }

    /// Record the entry function and run its first pass
    pub fn start(&mut self, entry: Resumable) -> Result<CallStatus> {
        if self.status != CallStatus::Initializing {
            return Err(UsageError::AlreadyStarted.into());
        }
        self.ensure_top_frame();
        self.entry = Some(entry);
        self.run_pass()
    }

    /// Run another pass of the entry function
    pub fn step(&mut self) -> Result<CallStatus> {
        match self.status {
            CallStatus::InProgress => self.run_pass(),
            CallStatus::Initializing => Err(UsageError::NotStarted.into()),
            CallStatus::Done => Err(UsageError::AlreadyDone.into()),
            CallStatus::Failed => Err(UsageError::Poisoned.into()),
        }
    }

    /// Discard all frames and return to Initializing
    pub fn reset(&mut self) {
        self.stack.clear();
        self.entry = None;
        self.passes = 0;
        self.status = CallStatus::Initializing;
        debug!(call = %self.id, "reset");
    }

    /// Read a top-level slot by position
    pub fn param<T: Any>(&self, index: usize) -> Result<&T> {
        self.stack.read(0, index)
    }

    pub fn param_mut<T: Any>(&mut self, index: usize) -> Result<&mut T> {
        self.stack.read_mut(0, index)
    }

    /// Slot 0 of the top-level frame
    pub fn result<T: Any>(&self) -> Result<&T> {
        self.param(0)
    }

    fn ensure_top_frame(&mut self) {
        if self.stack.is_empty() {
            self.stack.push_frame();
        }
    }

    fn run_pass(&mut self) -> Result<CallStatus> {
        let entry = self.entry.ok_or(UsageError::NotStarted)?;
        self.passes += 1;

        let span = debug_span!("pass", call = %self.id, pass = self.passes);
        let _enter = span.enter();

        match self.execute(entry) {
            Ok(step) => {
                let status = CallStatus::from(step);
                if status != self.status {
                    debug!(from = ?self.status, to = ?status, "status changed");
                }
                self.status = status;
                Ok(status)
            }
            Err(err) => {
                error!(%err, "resumable call failed");
                self.status = CallStatus::Failed;
                Err(err)
            }
        }
    }

    fn execute(&mut self, entry: Resumable) -> Result<Step> {
        self.stack.begin_pass()?;
        let step = entry(&mut self.stack)?;
        if self.stack.active_frame() != 0 {
            return Err(UsageError::UnbalancedPass {
                active: self.stack.active_frame(),
            }
            .into());
        }
        Ok(step)
    }
}

impl Default for ResumableCall {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResumableCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResumableCall")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("passes", &self.passes)
            .field("frames", &self.stack.frame_count())
            .finish()
    }
}
