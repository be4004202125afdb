//! Type definitions for the runtime
//!
//! This module contains the storage types a resumable call is built from:
//! - Type identity (TypeDescriptor)
//! - Erased values (VariableSlot, Var handles)
//! - Activation records (Frame)
//! - Pass outcomes and call status (Step, CallStatus)
//! - Resume points (ResumePoint)

pub mod control;
pub mod descriptor;
pub mod frame;
pub mod pc;
pub mod slot;

// Re-export all types for convenient access
pub use control::{CallStatus, Step};
pub use descriptor::TypeDescriptor;
pub use frame::Frame;
pub use pc::ResumePoint;
pub use slot::{Var, VariableSlot};
