//! Runtime errors
//!
//! Every error here is a protocol violation by a resumable body or by the
//! client driving it. Suspension is never an error.

use super::types::{ResumePoint, TypeDescriptor};
use std::any::{type_name, Any};
use thiserror::Error;

/// A slot was read as a type other than the one it was created with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("slot holds {stored}, read as {requested}")]
pub struct SlotTypeError {
    pub stored: &'static str,
    pub requested: &'static str,
}

impl SlotTypeError {
    pub(crate) fn new<T: Any>(stored: TypeDescriptor) -> Self {
        SlotTypeError {
            stored: stored.name(),
            requested: type_name::<T>(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatentError {
    #[error("type mismatch at frame {frame} slot {slot}: stored {stored}, requested {requested}")]
    TypeMismatch {
        frame: usize,
        slot: usize,
        stored: &'static str,
        requested: &'static str,
    },

    #[error("slot {index} out of range in frame {frame} ({len} slots)")]
    OutOfRange { frame: usize, index: usize, len: usize },

    #[error("unknown resume point {point}")]
    UnknownResumePoint { point: ResumePoint },

    #[error("arithmetic overflow computing {what}")]
    Overflow { what: &'static str },

    #[error(transparent)]
    Usage(#[from] UsageError),
}

impl LatentError {
    pub(crate) fn type_mismatch(frame: usize, slot: usize, err: SlotTypeError) -> Self {
        LatentError::TypeMismatch {
            frame,
            slot,
            stored: err.stored,
            requested: err.requested,
        }
    }

    pub fn unknown_resume_point(point: ResumePoint) -> Self {
        LatentError::UnknownResumePoint { point }
    }

    pub fn overflow(what: &'static str) -> Self {
        LatentError::Overflow { what }
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, LatentError::TypeMismatch { .. })
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, LatentError::Usage(_))
    }
}

/// Misuse of the stepping interface or of the nested-call bracketing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("call has not been started")]
    NotStarted,

    #[error("call was already started")]
    AlreadyStarted,

    #[error("call is already done")]
    AlreadyDone,

    #[error("call failed on an earlier pass; reset it before reuse")]
    Poisoned,

    #[error("no frame at index {index} ({len} frames)")]
    MissingFrame { index: usize, len: usize },

    #[error("nested call without a matching push_frame ({frames} frames, active frame {active})")]
    UnbracketedCall { frames: usize, active: usize },

    #[error("pop_frame would retire entered frame (active frame {active})")]
    PopActiveFrame { active: usize },

    #[error("pop_frame on an empty stack")]
    EmptyStack,

    #[error("leave_active_frame without a matching enter_active_frame")]
    FrameUnderflow,

    #[error("pass ended with active frame {active}, expected 0")]
    UnbalancedPass { active: usize },
}

pub type Result<T, E = LatentError> = std::result::Result<T, E>;
